use clap::Parser;
use extpack_lib::Config;
use std::{collections::HashMap, env, fs};

mod fs_utils;
mod manifest;
mod naming;
mod packaging;
mod process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browser extension bundle packager", long_about = None)]
pub struct Cli {
    /// Output archive name; supports %version%, %date%, %time%, %datetime%
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Project root containing the extension sources
    /// (defaults to the directory the tool itself lives in)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Dry run (list entries without writing the archive)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub dry: bool,

    /// Store entries uncompressed instead of deflating them
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub store: bool,

    /// Maximum archive size, e.g. 10Mi, 5MB or plain bytes (0 = unlimited)
    #[arg(short, long)]
    pub max_size: Option<String>,

    /// Full-path glob patterns to skip inside packaged directories
    /// (can be specified multiple times)
    #[arg(short = 's', long)]
    pub skip: Vec<String>,

    /// Directories to package instead of the built-in manifest
    /// (can be specified multiple times)
    #[arg(long = "dir")]
    pub dirs: Vec<String>,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,

    /// Files to package instead of the built-in manifest
    #[arg()]
    pub files: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Step 1: Read environment
    let env_config = read_env();

    // Step 2: Read config file (if exists)
    let mut file_config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config.config.clone()) {
        file_config = read_config_file(&path)?;
    }

    // Step 3: Merge configs: env < file < CLI
    let mut merged = merge_configs(env_config, file_config, cli_to_config(&cli));

    // Apply defaults for optional parameters
    if merged.output.is_none() {
        merged.output = Some(manifest::DEFAULT_OUTPUT_TEMPLATE.to_string());
    }
    if merged.compress.is_none() {
        merged.compress = Some(true);
    }
    if merged.files.is_none() {
        merged.files = Some(manifest::default_files());
    }
    if merged.dirs.is_none() {
        merged.dirs = Some(manifest::default_dirs());
    }

    // Generate YAML config if requested
    if cli.generate_yaml_config {
        let yaml = serde_yaml::to_string(&merged)?;
        println!("{yaml}");
        return Ok(());
    }

    process::run(&merged)?;
    Ok(())
}

/// Reads environment variables prefixed with EXTPACK_
fn read_env() -> Config {
    let mut cfg = Config::default();
    let vars: HashMap<String, String> = env::vars().collect();

    macro_rules! get_env {
        ($key:expr) => {
            vars.get(&format!("EXTPACK_{}", $key)).cloned()
        };
    }

    fn split_list(v: String) -> Vec<String> {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    cfg.output = get_env!("OUTPUT");
    cfg.config = get_env!("CONFIG");
    cfg.root = get_env!("ROOT");
    cfg.max_size = get_env!("MAX_SIZE");
    cfg.dry = get_env!("DRY").map(|v| v == "true" || v == "1" || v.eq_ignore_ascii_case("yes"));
    cfg.compress =
        get_env!("COMPRESS").map(|v| v == "true" || v == "1" || v.eq_ignore_ascii_case("yes"));
    cfg.files = get_env!("FILES").map(split_list);
    cfg.dirs = get_env!("DIRS").map(split_list);
    cfg.skip = get_env!("SKIP").map(split_list);
    cfg
}

/// Reads YAML or JSON config from file
fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    let lower = path.to_lowercase();
    let cfg = if lower.ends_with(".json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Converts CLI struct into Config
fn cli_to_config(cli: &Cli) -> Config {
    Config {
        output: cli.output.clone(),
        config: cli.config.clone(),
        root: cli.root.clone(),
        // Flags only override lower layers when actually given
        dry: if cli.dry { Some(true) } else { None },
        compress: if cli.store { Some(false) } else { None },
        max_size: cli.max_size.clone(),
        files: if cli.files.is_empty() {
            None
        } else {
            Some(cli.files.clone())
        },
        dirs: if cli.dirs.is_empty() {
            None
        } else {
            Some(cli.dirs.clone())
        },
        skip: if cli.skip.is_empty() {
            None
        } else {
            Some(cli.skip.clone())
        },
    }
}

/// Merge configs by priority: env < file < cli
fn merge_configs(env: Config, file: Config, cli: Config) -> Config {
    fn pick<T: Clone>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
        cli.or(file).or(env)
    }

    Config {
        output: pick(env.output, file.output, cli.output),
        config: pick(env.config, file.config, cli.config),
        root: pick(env.root, file.root, cli.root),
        dry: pick(env.dry, file.dry, cli.dry),
        compress: pick(env.compress, file.compress, cli.compress),
        max_size: pick(env.max_size, file.max_size, cli.max_size),
        files: pick(env.files, file.files, cli.files),
        dirs: pick(env.dirs, file.dirs, cli.dirs),
        skip: pick(env.skip, file.skip, cli.skip),
    }
}
