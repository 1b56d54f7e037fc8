use lasercube::{
    config::DEFAULT_CONFIG_PATH,
    demo::actions,
    gfx::rendering::WgpuShaderCompiler,
    DemoConfig, LaserCubeApp,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DemoConfig::load_or_default(DEFAULT_CONFIG_PATH)?;

    for line in actions::help_lines(&actions::bindings::<WgpuShaderCompiler>()) {
        log::info!("{line}");
    }

    LaserCubeApp::new(config)?.run()
}
