use anyhow::{anyhow, Result};
use prodino_config::{codegen::generate_modules, Configuration};
use std::{
    env,
    fs::File,
    io::{BufReader, Read},
};

const DEFAULT_CONFIG_FILENAME: &str = "prodino_leonardo_default_config.ron";

fn main() -> Result<()> {
    process_configuration_file()
}

fn process_configuration_file() -> Result<()> {
    println!("cargo:rerun-if-env-changed=PRODINO_CONFIG");
    println!(
        "cargo:rerun-if-changed=./prodino_config/sample_configurations/{}",
        DEFAULT_CONFIG_FILENAME
    );

    let filename = if let Ok(filename) = env::var("PRODINO_CONFIG") {
        println!("cargo:rerun-if-changed={}", filename);
        filename
    } else {
        format!("./prodino_config/sample_configurations/{}", DEFAULT_CONFIG_FILENAME)
    };

    let file = File::open(&filename).map_err(|e| anyhow!("Can't open {}: {}", filename, e))?;
    let mut buf_reader = BufReader::new(file);
    let mut contents = String::new();
    buf_reader.read_to_string(&mut contents)?;
    let configuration: Configuration = ron::from_str(&contents)?;
    generate_modules(env::var("OUT_DIR")?, &configuration)?;

    Ok(())
}
