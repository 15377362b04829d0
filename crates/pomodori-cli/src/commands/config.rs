use clap::Subcommand;
use pomodori_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a configuration value by dotted key
    Get { key: String },
    /// Set a configuration value by dotted key
    Set { key: String, value: String },
    /// Print the whole configuration as TOML
    List,
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
