use landscape::{
    FilterKind, GenerationParameters, LandscapeConfig, Parameter, RegenState,
    RegenerationScheduler, TerrainPalette,
};

#[test]
fn single_cell_scenario() {
    let params = GenerationParameters {
        resolution: 1,
        octaves: 1,
        gain: 0.5,
        lacunarity: 2.0,
        scale: 1.0,
        shift: [0.0, 0.0],
        seed: 0,
        ..Default::default()
    };
    let mut scheduler = RegenerationScheduler::new(params, TerrainPalette::default())
        .expect("valid parameters");
    scheduler.tick().expect("build");

    let mesh = scheduler.mesh();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.indices.len(), 6);
    assert!(mesh.indices.iter().all(|&i| i <= 3));
    assert!(mesh.is_consistent());
}

#[test]
fn dirty_flag_lifecycle() {
    let params = GenerationParameters {
        resolution: 8,
        ..Default::default()
    };
    let mut scheduler =
        RegenerationScheduler::new(params, TerrainPalette::default()).expect("valid parameters");

    // starts dirty, one tick builds once
    assert_eq!(scheduler.state(), RegenState::Dirty);
    assert!(scheduler.tick().unwrap());
    assert_eq!(scheduler.state(), RegenState::Clean);
    assert_eq!(scheduler.build_count(), 1);

    // every UI-facing parameter raises the flag again
    let updates: [(Parameter, landscape::ParamValue); 7] = [
        (Parameter::Gain, 0.6.into()),
        (Parameter::Lacunarity, 2.5.into()),
        (Parameter::Octaves, 3.0.into()),
        (Parameter::ShiftX, 1.25.into()),
        (Parameter::ShiftY, (-0.5).into()),
        (Parameter::Scale, 3.0.into()),
        (Parameter::FilterEnabled, true.into()),
    ];
    for (i, (parameter, value)) in updates.into_iter().enumerate() {
        scheduler.set_parameter(parameter, value).unwrap();
        assert_eq!(scheduler.state(), RegenState::Dirty, "{parameter}");
        assert!(scheduler.tick().unwrap());
        assert_eq!(scheduler.build_count(), i as u64 + 2);
    }

    // nothing changed since the last clean state
    assert!(!scheduler.tick().unwrap());
    assert_eq!(scheduler.build_count(), 8);
}

#[test]
fn identical_parameters_build_identical_meshes() {
    let params = GenerationParameters {
        resolution: 16,
        seed: 1234,
        filter_enabled: true,
        sharpness: 5.0,
        ..Default::default()
    };
    let mut a = RegenerationScheduler::new(params, TerrainPalette::default()).unwrap();
    let mut b = RegenerationScheduler::new(params, TerrainPalette::default()).unwrap();
    a.tick().unwrap();
    b.tick().unwrap();

    let heights = |s: &RegenerationScheduler| -> Vec<u32> {
        s.mesh().vertices.iter().map(|v| v[1].to_bits()).collect()
    };
    assert_eq!(heights(&a), heights(&b));
    assert_eq!(a.mesh().colors_rgba8(), b.mesh().colors_rgba8());
}

#[test]
fn config_drives_scheduler() {
    let json = r#"{
        "parameters": {
            "resolution": 6,
            "height": 20.0,
            "filterEnabled": true,
            "filterKind": "water"
        },
        "palette": {
            "standard": [
                { "threshold": 0.8, "color": [0.0, 0.2, 0.8, 1.0], "name": "water" },
                { "threshold": 100.0, "color": [0.3, 0.7, 0.3, 1.0], "name": "land" }
            ]
        }
    }"#;
    let config = LandscapeConfig::from_json_str(json).unwrap();
    assert_eq!(config.parameters.filter_kind, FilterKind::Water);

    let mut scheduler = RegenerationScheduler::new(config.parameters, config.palette()).unwrap();
    scheduler.tick().unwrap();
    let mesh = scheduler.mesh();
    assert_eq!(mesh.vertex_count(), 49);
    // water level = 0.8 * 20
    assert!(mesh.vertices.iter().all(|v| v[1] >= 16.0));
}

#[test]
fn shipped_app_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../app/landscape.json");
    let config = LandscapeConfig::load(path).expect("sample config is valid");
    let palette = config.palette();
    assert_eq!(palette.standard.len(), 7);
    assert_eq!(palette.buttes.len(), 5);
    assert_eq!(config.parameters.resolution, 128);
}

#[test]
fn overflowing_extent_never_reaches_a_build() {
    let params = GenerationParameters {
        resolution: 4,
        ..Default::default()
    };
    let mut scheduler = RegenerationScheduler::new(params, TerrainPalette::default()).unwrap();
    scheduler.tick().unwrap();

    assert!(scheduler.set_parameter(Parameter::Height, 1.0e300).is_err());
    assert!(scheduler.set_parameter(Parameter::Length, 1.0e-50).is_err());
    assert_eq!(scheduler.state(), RegenState::Clean);
    assert!(!scheduler.tick().unwrap());

    scheduler.set_parameter(Parameter::Height, 80.0).unwrap();
    assert!(scheduler.tick().unwrap());
    assert_eq!(scheduler.state(), RegenState::Clean);
}
