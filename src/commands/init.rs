use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use crate::config::Config;

/// Run the init command - interactively create a config file
pub fn run(force: bool) -> Result<()> {
    let config_path = Config::config_path()?;

    // Check if config already exists
    if config_path.exists() && !force {
        eprintln!(
            "{}: Config already exists at {}",
            "Error".red().bold(),
            config_path.display()
        );
        eprintln!();
        eprintln!("Use {} to overwrite.", "--force".cyan());
        bail!("Config file already exists");
    }

    println!("{}", "shelfctl configuration".bold());
    println!();
    println!(
        "This will create a config file at: {}",
        config_path.display().to_string().cyan()
    );
    println!();

    let defaults = Config::default();
    let library_url = prompt_url(
        "Step 1: Where is your library backend?",
        &[
            "http://localhost:8080 (port-forward on this machine)",
            "http://10.0.2.2:8080 (port-forward seen from an emulator)",
            "http://192.168.49.2:30800 (minikube NodePort)",
        ],
        &defaults.library.base_url,
    )?;
    let catalog_url = prompt_url(
        "Step 2: Which book catalog should searches use?",
        &[],
        &defaults.catalog.base_url,
    )?;

    // Create config directory
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let config_content = render_config(&library_url, &catalog_url);

    std::fs::write(&config_path, &config_content)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!();
    println!(
        "{} Config written to {}",
        "✓".green(),
        config_path.display()
    );
    println!();
    println!("You can now use:");
    println!(
        "  {} - check the library connection",
        "shelfctl health".cyan()
    );
    println!(
        "  {} - find a book and save it",
        "shelfctl save \"<title>\"".cyan()
    );

    Ok(())
}

fn render_config(library_url: &str, catalog_url: &str) -> String {
    format!(
        r#"# shelfctl configuration

[library]
base_url = "{}"
page_size = 50

[catalog]
base_url = "{}"

[http]
connect_timeout_secs = 30
read_timeout_secs = 30
write_timeout_secs = 30
retry_on_connect_failure = true
"#,
        library_url, catalog_url
    )
}

fn prompt_url(heading: &str, examples: &[&str], default: &str) -> Result<String> {
    println!("{}", heading.bold());
    println!();

    if !examples.is_empty() {
        println!("{}", "Examples:".bold());
        for example in examples {
            println!("  {}", example.green());
        }
        println!();
    }

    print!("Enter URL [{}]: ", default.green());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    let url = if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    };

    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("URL must start with http:// or https://: {}", url);
    }

    println!();
    Ok(url.trim_end_matches('/').to_string())
}
