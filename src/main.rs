use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studiogen::{config, generate, output, scan};

#[derive(Parser)]
#[command(name = "studiogen")]
#[command(about = "Static site generator for studio portfolios")]
#[command(long_about = "\
Static site generator for studio portfolios

Markdown files with a frontmatter header are the data source; HTML files with
{{name}} placeholders are the templates.

Project structure:

  site.toml                        # Optional config (run 'studiogen gen-config')
  src/content/
  ├── index.md                     # Home; each '# Heading' becomes a section
  ├── about.md                     # Singleton, exposed to the home page as {{about}}
  ├── contacts.md                  # Singleton, with an optional 'contacts:' list
  ├── legal.md                     # Any file with 'permalink:' → /legal/
  ├── games/                       # Collection → /games/<name>/
  │   └── starfall.md              # 'order:' sorts the grid
  └── projects/
      └── demo.md
  src/templates/
  ├── index.html                   # Home, with {{#each sections}}...{{/each}}
  ├── entry.html                   # Collection entry pages
  ├── bare.html                    # Pages with 'no_style: true'
  └── header.html, menu.html, footer.html

Output goes to site/ with clean URLs (<path>/index.html).")]
#[command(version)]
struct Cli {
    /// Project root (where site.toml lives)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (overrides paths.output)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify content and write the site
    Build,
    /// Classify content without writing anything
    Check {
        /// Print the inventory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.resolve_paths(&cli.root, cli.output.as_deref());

            println!("==> Building {}", paths.content.display());
            let report = generate::build(&site_config, &paths)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", paths.output.display());
        }
        Command::Check { json } => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.resolve_paths(&cli.root, cli.output.as_deref());
            let inventory = scan::scan(&paths.content, &site_config.content)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&inventory)?);
            } else {
                println!("==> Checking {}", paths.content.display());
                output::print_scan_output(&inventory, &paths.content);
                println!("==> Content is valid");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
