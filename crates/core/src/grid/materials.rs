//! Initial material assignment
//!
//! Materials are assigned once at initialization. The clustered policy walks
//! the grid row-major and boosts water/bedrock probabilities next to cells
//! that already hold that material, which grows lakes and rock outcrops.

use crate::core_types::{Material, SimRng};
use crate::error::{check_probability, GridError};
use crate::grid::LandscapeMap;
use serde::{Deserialize, Serialize};

/// Material for cells that the clustered policy does not make water or bedrock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Fill {
    #[default]
    Grass,
    /// 50/50 grass or tree per cell
    GrassOrTree,
}

/// Parameters for clustered lake and outcrop generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Base chance a cell becomes water
    pub water_probability: f32,
    /// Base chance a cell becomes bedrock
    pub bedrock_probability: f32,
    /// Multiplier applied to a base chance when a 4-neighbour already has that material
    pub cluster_bonus: f32,
    pub fill: Fill,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            water_probability: 0.01,
            bedrock_probability: 0.01,
            cluster_bonus: 40.0,
            fill: Fill::Grass,
        }
    }
}

impl ClusterConfig {
    /// # Errors
    /// Returns an error for probabilities outside `[0, 1]` or a negative bonus
    pub fn validate(&self) -> Result<(), GridError> {
        check_probability("materials.water_probability", self.water_probability)?;
        check_probability("materials.bedrock_probability", self.bedrock_probability)?;
        if !self.cluster_bonus.is_finite() || self.cluster_bonus < 0.0 {
            return Err(GridError::InvalidParameter {
                name: "materials.cluster_bonus",
                message: format!("must be finite and non-negative, got {}", self.cluster_bonus),
            });
        }
        Ok(())
    }
}

/// How initial materials are chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialPolicy {
    /// Every cell gets the same material
    Uniform(Material),
    /// Each cell is grass or tree with equal probability
    RandomGrassTree,
    /// Spatially coherent water and bedrock over a grass (or grass/tree) fill
    Clustered(ClusterConfig),
    /// Materials decoded from a landscape raster
    Landscape(LandscapeMap),
}

impl Default for MaterialPolicy {
    fn default() -> Self {
        MaterialPolicy::Uniform(Material::Grass)
    }
}

impl MaterialPolicy {
    /// Short name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MaterialPolicy::Uniform(_) => "uniform",
            MaterialPolicy::RandomGrassTree => "random-grass-tree",
            MaterialPolicy::Clustered(_) => "clustered",
            MaterialPolicy::Landscape(_) => "landscape",
        }
    }

    /// # Errors
    /// Returns an error if a clustered configuration is out of range or a
    /// landscape map does not cover its own dimensions
    pub fn validate(&self) -> Result<(), GridError> {
        match self {
            MaterialPolicy::Clustered(cluster) => cluster.validate(),
            MaterialPolicy::Landscape(map) => map.validate(),
            _ => Ok(()),
        }
    }

    /// Materials for a `width × height` grid in row-major order
    pub fn assign(&self, width: usize, height: usize, rng: &mut SimRng) -> Vec<Material> {
        let total = width * height;
        match self {
            MaterialPolicy::Uniform(material) => vec![*material; total],
            MaterialPolicy::RandomGrassTree => {
                (0..total).map(|_| grass_or_tree(rng)).collect()
            }
            MaterialPolicy::Clustered(cluster) => assign_clustered(cluster, width, height, rng),
            MaterialPolicy::Landscape(map) => {
                let mut materials = Vec::with_capacity(total);
                for y in 0..height {
                    for x in 0..width {
                        materials.push(map.get(x, y).unwrap_or_default());
                    }
                }
                materials
            }
        }
    }
}

fn grass_or_tree(rng: &mut SimRng) -> Material {
    if rng.uniform() < 0.5 {
        Material::Grass
    } else {
        Material::Tree
    }
}

fn assign_clustered(
    cluster: &ClusterConfig,
    width: usize,
    height: usize,
    rng: &mut SimRng,
) -> Vec<Material> {
    let mut assigned: Vec<Option<Material>> = vec![None; width * height];

    for y in 0..height {
        for x in 0..width {
            let near = |material: Material| {
                let mut neighbours = [None; 4];
                if x > 0 {
                    neighbours[0] = assigned[y * width + x - 1];
                }
                if x + 1 < width {
                    neighbours[1] = assigned[y * width + x + 1];
                }
                if y > 0 {
                    neighbours[2] = assigned[(y - 1) * width + x];
                }
                if y + 1 < height {
                    neighbours[3] = assigned[(y + 1) * width + x];
                }
                neighbours.contains(&Some(material))
            };

            let boost = |base: f32, material: Material| {
                if near(material) {
                    (base * cluster.cluster_bonus).min(1.0)
                } else {
                    base
                }
            };
            let water = boost(cluster.water_probability, Material::Water);
            let bedrock = boost(cluster.bedrock_probability, Material::Bedrock);

            let u = rng.uniform();
            let material = if u < water {
                Material::Water
            } else if u < water + bedrock {
                Material::Bedrock
            } else {
                match cluster.fill {
                    Fill::Grass => Material::Grass,
                    Fill::GrassOrTree => grass_or_tree(rng),
                }
            };
            assigned[y * width + x] = Some(material);
        }
    }

    assigned.into_iter().map(Option::unwrap_or_default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Count horizontally or vertically adjacent water pairs
    fn water_adjacency(materials: &[Material], width: usize, height: usize) -> usize {
        let mut pairs = 0;
        for y in 0..height {
            for x in 0..width {
                if materials[y * width + x] != Material::Water {
                    continue;
                }
                if x + 1 < width && materials[y * width + x + 1] == Material::Water {
                    pairs += 1;
                }
                if y + 1 < height && materials[(y + 1) * width + x] == Material::Water {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    #[test]
    fn test_uniform_policies() {
        let mut rng = SimRng::default();
        let all = MaterialPolicy::Uniform(Material::Bedrock).assign(3, 2, &mut rng);
        assert_eq!(all, vec![Material::Bedrock; 6]);
        let grass = MaterialPolicy::default().assign(2, 2, &mut rng);
        assert!(grass.iter().all(|m| *m == Material::Grass));
    }

    #[test]
    fn test_random_grass_tree_mix() {
        let materials = MaterialPolicy::RandomGrassTree.assign(64, 64, &mut SimRng::from_seed_u64(2));
        let trees = materials.iter().filter(|m| **m == Material::Tree).count();
        assert!(materials
            .iter()
            .all(|m| matches!(m, Material::Grass | Material::Tree)));
        assert!((1600..2500).contains(&trees), "tree count {trees}");
    }

    #[test]
    fn test_clustering_increases_adjacency() {
        let (w, h) = (64, 64);
        let clustered = ClusterConfig {
            water_probability: 0.02,
            bedrock_probability: 0.0,
            cluster_bonus: 20.0,
            fill: Fill::Grass,
        };
        let independent = ClusterConfig {
            cluster_bonus: 1.0,
            ..clustered
        };

        let a = MaterialPolicy::Clustered(clustered).assign(w, h, &mut SimRng::from_seed_u64(8));
        let b = MaterialPolicy::Clustered(independent).assign(w, h, &mut SimRng::from_seed_u64(8));
        assert!(water_adjacency(&a, w, h) > water_adjacency(&b, w, h));
    }

    #[test]
    fn test_zero_probabilities_give_fill_only() {
        let cluster = ClusterConfig {
            water_probability: 0.0,
            bedrock_probability: 0.0,
            ..ClusterConfig::default()
        };
        let materials = MaterialPolicy::Clustered(cluster).assign(10, 10, &mut SimRng::default());
        assert!(materials.iter().all(|m| *m == Material::Grass));
    }

    #[test]
    fn test_cluster_validation() {
        let bad = ClusterConfig {
            water_probability: 1.5,
            ..ClusterConfig::default()
        };
        assert!(MaterialPolicy::Clustered(bad).validate().is_err());
        let bad = ClusterConfig {
            cluster_bonus: -1.0,
            ..ClusterConfig::default()
        };
        assert!(bad.validate().is_err());
        assert!(MaterialPolicy::Clustered(ClusterConfig::default())
            .validate()
            .is_ok());
    }
}
