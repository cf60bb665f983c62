//! Initialization from terrain inputs, snapshot export and config files

use wildfire_grid_core::{
    CellLocation, CellState, ClusterConfig, ColorPalette, Fill, GridError, InitWarning,
    LandscapePalette, Material, MaterialPolicy, Raster, Sampling, SimulationConfig,
    TerrainSource, WildfireSimulation,
};

fn landscape_stripes(width: usize, height: usize) -> Vec<u8> {
    // Columns cycle water, bedrock, grass, tree
    let colours = [[181, 219, 235], [207, 198, 180], [121, 150, 114], [34, 87, 22]];
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..height {
        for x in 0..width {
            data.extend_from_slice(&colours[x % 4]);
        }
    }
    data
}

#[test]
fn test_malformed_heightmap_falls_back_to_flat_terrain() {
    let terrain = TerrainSource::new().with_heightmap_bytes(16, 16, 1, vec![200; 10]);
    let sim = WildfireSimulation::initialize(
        SimulationConfig::reference().with_size(8, 8),
        1,
        terrain,
    )
    .unwrap();

    assert_eq!(sim.init_warnings().len(), 1);
    assert!(matches!(
        sim.init_warnings()[0],
        InitWarning::HeightmapUnavailable(_)
    ));
    assert!(sim.grid().cells().iter().all(|c| c.height() == 0.0));
    assert_eq!(sim.count_by_state(CellState::NotOnFire), 64);
}

#[test]
fn test_host_load_failures_are_reported() {
    let terrain = TerrainSource::new()
        .with_heightmap_failure("heightmap.png: No such file")
        .with_landscape_failure("landscape.png: No such file");
    let sim = WildfireSimulation::initialize(
        SimulationConfig::reference().with_size(4, 4),
        1,
        terrain,
    )
    .unwrap();
    assert_eq!(sim.init_warnings().len(), 2);
    assert_eq!(sim.grid().count_by_material(Material::Grass), 16);
}

#[test]
fn test_grayscale_landscape_is_rejected_with_warning() {
    let landscape = Raster::luma(4, 4, vec![0; 16]).unwrap();
    let mut config = SimulationConfig::reference().with_size(4, 4);
    config.materials = MaterialPolicy::Uniform(Material::Bedrock);
    let sim =
        WildfireSimulation::initialize(config, 1, TerrainSource::new().with_landscape(landscape))
            .unwrap();

    assert!(matches!(
        sim.init_warnings()[0],
        InitWarning::LandscapeUnavailable(_)
    ));
    // Falls back to the configured policy
    assert_eq!(sim.grid().count_by_material(Material::Bedrock), 16);
}

#[test]
fn test_landscape_sets_initial_materials() {
    let terrain = TerrainSource::new()
        .with_landscape_bytes(8, 2, landscape_stripes(8, 2))
        .with_palette(LandscapePalette::reference());
    let sim = WildfireSimulation::initialize(
        SimulationConfig::reference().with_size(8, 2),
        1,
        terrain,
    )
    .unwrap();

    assert!(sim.init_warnings().is_empty());
    let expected = [Material::Water, Material::Bedrock, Material::Grass, Material::Tree];
    for y in 0..2 {
        for x in 0..8 {
            assert_eq!(sim.grid().cell(x, y).unwrap().material(), expected[x % 4]);
        }
    }
}

#[test]
fn test_heightmap_is_resampled_to_grid() {
    // 8x8 gradient along x, downsampled to 4x4
    let data: Vec<u8> = (0..8)
        .flat_map(|_| (0..8).map(|x| (x * 255 / 7) as u8))
        .collect();
    let terrain = TerrainSource::new()
        .with_heightmap_bytes(8, 8, 1, data)
        .with_sampling(Sampling::Bilinear);
    let sim = WildfireSimulation::initialize(
        SimulationConfig::reference().with_size(4, 4),
        1,
        terrain,
    )
    .unwrap();

    let row: Vec<f32> = (0..4)
        .map(|x| sim.grid().cell(x, 2).unwrap().height())
        .collect();
    assert!(row.windows(2).all(|w| w[0] < w[1]), "heights {row:?}");
    assert!(row.iter().all(|h| (0.0..=1.0).contains(h)));
}

#[test]
fn test_height_does_not_change_spread() {
    let mut config = SimulationConfig::reference().with_size(16, 16);
    config.flammability.grass = 0.6;

    let flat = WildfireSimulation::new(config.clone(), 21).unwrap();
    let hilly = WildfireSimulation::initialize(
        config,
        21,
        TerrainSource::new().with_heightmap_bytes(2, 2, 1, vec![0, 255, 255, 0]),
    )
    .unwrap();

    let mut flat = flat;
    let mut hilly = hilly;
    flat.ignite(CellLocation::new(8, 8));
    hilly.ignite(CellLocation::new(8, 8));
    flat.advance_by(12);
    hilly.advance_by(12);

    for (a, b) in flat.grid().cells().iter().zip(hilly.grid().cells()) {
        assert_eq!(a.state(), b.state());
    }
}

#[test]
fn test_clustered_materials_form_lakes() {
    let mut config = SimulationConfig::reference().with_size(48, 48);
    config.materials = MaterialPolicy::Clustered(ClusterConfig {
        water_probability: 0.02,
        bedrock_probability: 0.01,
        cluster_bonus: 25.0,
        fill: Fill::GrassOrTree,
    });
    let sim = WildfireSimulation::new(config, 6).unwrap();
    let stats = sim.stats();

    assert!(stats.water > 0);
    assert!(stats.grass > 0 && stats.tree > 0);
    assert_eq!(
        stats.grass + stats.tree + stats.water + stats.bedrock,
        48 * 48
    );
}

#[test]
fn test_snapshot_matches_palette() {
    let mut sim = WildfireSimulation::new(SimulationConfig::reference().with_size(6, 4), 2).unwrap();
    sim.set_cell(CellLocation::new(0, 0), CellState::OnFire, Material::Grass);
    sim.set_cell(CellLocation::new(1, 0), CellState::Destroyed, Material::Grass);
    sim.set_cell(CellLocation::new(2, 0), CellState::NotOnFire, Material::Water);
    sim.set_cell(CellLocation::new(3, 0), CellState::NotOnFire, Material::Bedrock);
    sim.set_cell(CellLocation::new(4, 0), CellState::NotOnFire, Material::Tree);

    let palette = ColorPalette::compute();
    let raster = sim.render_snapshot(&palette);
    assert_eq!((raster.width, raster.height), (6, 4));
    assert_eq!(raster.data.len(), 6 * 4 * 3);
    assert_eq!(raster.pixel(0, 0), Some(palette.fire));
    assert_eq!(raster.pixel(1, 0), Some(palette.destroyed));
    assert_eq!(raster.pixel(2, 0), Some(palette.water));
    assert_eq!(raster.pixel(3, 0), Some(palette.bedrock));
    assert_eq!(raster.pixel(4, 0), Some(palette.tree));
    assert_eq!(raster.pixel(5, 3), Some(palette.grass));

    // Rendering is read-only
    let before = sim.grid().clone();
    let _ = sim.render_snapshot(&ColorPalette::reference());
    assert_eq!(sim.grid(), &before);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "wildfire-grid-config-{}.json",
        std::process::id()
    ));
    let mut config = SimulationConfig::extended().with_size(20, 10);
    config.rain.enabled = true;
    config.save_json(&path).unwrap();

    let loaded = SimulationConfig::load_json(&path).unwrap();
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        SimulationConfig::load_json(&path),
        Err(GridError::ConfigIo(_))
    ));
}

#[test]
fn test_short_landscape_config_is_refused() {
    let json = r#"{"width":4,"height":4,"materials":{"Landscape":{"width":4,"height":4,"materials":["Water"]}}}"#;
    assert!(matches!(
        SimulationConfig::from_json_str(json),
        Err(GridError::RasterSizeMismatch { .. })
    ));

    // Same map built in code is refused at construction instead of panicking
    let map = serde_json::from_str(r#"{"width":4,"height":4,"materials":["Water"]}"#).unwrap();
    let mut config = SimulationConfig::reference().with_size(4, 4);
    config.materials = MaterialPolicy::Landscape(map);
    assert!(matches!(
        WildfireSimulation::new(config, 1),
        Err(GridError::RasterSizeMismatch {
            expected: 16,
            actual: 1
        })
    ));
}
