use std::cmp::max;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use signalrgb_control_lib::model::{Effect, EffectPreset, Layout};
use signalrgb_control_lib::{AsyncSignalRgbClient, SignalRgbError, DEFAULT_HOST, DEFAULT_PORT};

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = handle_cli(cli).await {
        eprintln!("Error: {err:#}");
        if let Some(client_err) = err.downcast_ref::<SignalRgbError>() {
            print_error_hint(client_err);
        }
        process::exit(1);
    }
}

fn default_host() -> String {
    std::env::var("SIGNALRGB_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

fn default_port() -> u16 {
    std::env::var("SIGNALRGB_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// This struct defines the command line interface of the application
#[derive(Parser)]
#[clap(
    name = "signalrgb-control",
    about = "Controls SignalRGB lighting from the command line",
    version
)]
pub struct Cli {
    /// Host of the SignalRGB API (or set SIGNALRGB_HOST)
    #[clap(long, default_value_t = default_host())]
    pub host: String,

    /// Port of the SignalRGB API (or set SIGNALRGB_PORT)
    #[clap(long, default_value_t = default_port())]
    pub port: u16,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Supported output formats for listing commands.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Plain text format.
    Plaintext,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

/// Sort keys for the effect listing.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Name,
    Id,
}

/// Subcommands available for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Lists all available effects.
    #[clap(name = "list-effects")]
    ListEffects {
        /// Sort effects by name or id
        #[clap(long, value_enum, default_value_t = SortBy::Name)]
        sort_by: SortBy,

        /// Reverse the sort order
        #[clap(long)]
        reverse: bool,

        /// Output format (plaintext, json, yaml)
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
        output: OutputFormat,
    },
    /// Shows the details of a specific effect.
    #[clap(name = "get-effect")]
    GetEffect {
        /// Name of the effect
        effect_name: String,
    },
    /// Searches effects by name, description, or publisher.
    #[clap(name = "search-effects")]
    SearchEffects {
        /// Text to search for
        query: String,
    },
    /// Shows the currently active effect.
    #[clap(name = "current-effect")]
    CurrentEffect,
    /// Applies an effect by name.
    #[clap(name = "apply-effect")]
    ApplyEffect {
        /// Name of the effect
        effect_name: String,
    },
    /// Shows the next effect in history without applying it.
    #[clap(name = "next-effect")]
    NextEffect,
    /// Applies the next effect in history.
    #[clap(name = "apply-next")]
    ApplyNext,
    /// Shows the previous effect in history without applying it.
    #[clap(name = "previous-effect")]
    PreviousEffect,
    /// Applies the previous effect in history.
    #[clap(name = "apply-previous")]
    ApplyPrevious,
    /// Applies a random effect.
    #[clap(name = "apply-random")]
    ApplyRandom,
    /// Gets the global brightness, or sets it when a value is given.
    #[clap(name = "brightness")]
    Brightness {
        /// Brightness level (0-100)
        value: Option<u8>,
    },
    /// Enables the canvas.
    #[clap(name = "enable")]
    Enable,
    /// Disables the canvas.
    #[clap(name = "disable")]
    Disable,
    /// Shows whether the canvas is enabled.
    #[clap(name = "enabled-state")]
    EnabledState,
    /// Toggles the canvas enabled state.
    #[clap(name = "toggle")]
    Toggle,
    /// Lists the presets of an effect.
    #[clap(name = "list-presets")]
    ListPresets {
        /// Name of the effect
        effect_name: String,
    },
    /// Applies a preset for an effect.
    #[clap(name = "apply-preset")]
    ApplyPreset {
        /// Name of the effect
        effect_name: String,
        /// Id of the preset
        preset_id: String,
    },
    /// Shows the current layout.
    #[clap(name = "current-layout")]
    CurrentLayout,
    /// Sets the current layout.
    #[clap(name = "set-layout")]
    SetLayout {
        /// Id of the layout
        layout_id: String,
    },
    /// Lists all available layouts.
    #[clap(name = "list-layouts")]
    ListLayouts {
        /// Output format (plaintext, json, yaml)
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
        output: OutputFormat,
    },
    /// Clears the cached effect list.
    #[clap(name = "refresh-effects")]
    RefreshEffects,
}

async fn handle_cli(cli: Cli) -> Result<()> {
    let client = AsyncSignalRgbClient::new(&cli.host, cli.port);

    match cli.command {
        Commands::ListEffects {
            sort_by,
            reverse,
            output,
        } => {
            let mut effects = client.list_effects().await?;
            match sort_by {
                SortBy::Name => {
                    effects.sort_by_key(|e| e.attributes.name.to_lowercase());
                }
                SortBy::Id => effects.sort_by_key(|e| e.id.to_lowercase()),
            }
            if reverse {
                effects.reverse();
            }
            print_effects(&effects, output)?;
        }
        Commands::GetEffect { effect_name } => {
            let effect = client.get_effect_by_name(&effect_name).await?;
            print_effect_details(&effect);
        }
        Commands::SearchEffects { query } => {
            let needle = query.to_lowercase();
            let effects = client.list_effects().await?;
            let matches: Vec<Effect> = effects
                .into_iter()
                .filter(|e| {
                    e.attributes.name.to_lowercase().contains(&needle)
                        || e.attributes
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle))
                        || e.attributes
                            .publisher
                            .as_deref()
                            .is_some_and(|p| p.to_lowercase().contains(&needle))
                })
                .collect();
            if matches.is_empty() {
                println!("No effects found matching '{query}'");
            } else {
                print_effects(&matches, OutputFormat::Plaintext)?;
            }
        }
        Commands::CurrentEffect => {
            let effect = client.get_current_effect().await?;
            print_effect_details(&effect);
        }
        Commands::ApplyEffect { effect_name } => {
            client.apply_effect_by_name(&effect_name).await?;
            println!("Applied effect: {effect_name}");
        }
        Commands::NextEffect => match client.get_next_effect().await? {
            Some(effect) => print_effect_details(&effect),
            None => println!("No next effect available"),
        },
        Commands::ApplyNext => {
            let effect = client.apply_next_effect().await?;
            println!("Applied effect: {}", effect.attributes.name);
        }
        Commands::PreviousEffect => match client.get_previous_effect().await? {
            Some(effect) => print_effect_details(&effect),
            None => println!("No previous effect available"),
        },
        Commands::ApplyPrevious => {
            let effect = client.apply_previous_effect().await?;
            println!("Applied effect: {}", effect.attributes.name);
        }
        Commands::ApplyRandom => {
            let effect = client.apply_random_effect().await?;
            println!("Applied random effect: {}", effect.attributes.name);
        }
        Commands::Brightness { value } => match value {
            Some(value) => {
                client.set_brightness(value).await?;
                println!("Brightness set to {value}");
            }
            None => println!("Current brightness: {}", client.get_brightness().await?),
        },
        Commands::Enable => {
            client.set_enabled(true).await?;
            println!("Canvas enabled");
        }
        Commands::Disable => {
            client.set_enabled(false).await?;
            println!("Canvas disabled");
        }
        Commands::EnabledState => {
            let state = if client.get_enabled().await? {
                "enabled"
            } else {
                "disabled"
            };
            println!("Canvas is currently {state}");
        }
        Commands::Toggle => {
            let enabled = client.get_enabled().await?;
            client.set_enabled(!enabled).await?;
            let state = if enabled { "disabled" } else { "enabled" };
            println!("Canvas {state}");
        }
        Commands::ListPresets { effect_name } => {
            let effect = client.get_effect_by_name(&effect_name).await?;
            let presets = client.get_effect_presets(&effect.id).await?;
            print_presets_table(&effect.attributes.name, &presets);
        }
        Commands::ApplyPreset {
            effect_name,
            preset_id,
        } => {
            let effect = client.get_effect_by_name(&effect_name).await?;
            client.apply_effect_preset(&effect.id, &preset_id).await?;
            println!("Applied preset '{preset_id}' for effect: {effect_name}");
        }
        Commands::CurrentLayout => {
            let layout = client.get_current_layout().await?;
            println!("Current layout: {}", layout.id);
        }
        Commands::SetLayout { layout_id } => {
            client.set_current_layout(&layout_id).await?;
            println!("Current layout set to: {layout_id}");
        }
        Commands::ListLayouts { output } => {
            let layouts = client.list_layouts().await?;
            match output {
                OutputFormat::Plaintext => print_layouts_table(&layouts),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layouts)?),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&layouts)?),
            }
        }
        Commands::RefreshEffects => {
            client.refresh_effects();
            println!("Effects cache refreshed");
        }
    }

    Ok(())
}

fn print_effects(effects: &[Effect], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Plaintext => {
            print_effects_table(effects);
            println!("Total effects: {}", effects.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(effects)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(effects)?),
    }
    Ok(())
}

fn print_effects_table(effects: &[Effect]) {
    // Determine the maximum width for each column
    let max_id_width = effects.iter().map(|e| e.id.len()).max().unwrap_or(0);
    let max_name_width = effects
        .iter()
        .map(|e| max(e.attributes.name.len(), 20))
        .max()
        .unwrap_or(0);

    println!(
        "{:<id_width$} {:<name_width$}",
        "ID",
        "Name",
        id_width = max_id_width + 2,
        name_width = max_name_width + 2,
    );
    println!(
        "{:<id_width$} {:<name_width$}",
        "-".repeat(max_id_width),
        "-".repeat(max_name_width),
        id_width = max_id_width + 2,
        name_width = max_name_width + 2,
    );
    for effect in effects {
        println!(
            "{:<id_width$} {:<name_width$}",
            effect.id,
            effect.attributes.name,
            id_width = max_id_width + 2,
            name_width = max_name_width + 2,
        );
    }
}

fn print_effect_details(effect: &Effect) {
    println!("ID:          {}", effect.id);
    println!("Name:        {}", effect.attributes.name);
    println!(
        "Publisher:   {}",
        effect.attributes.publisher.as_deref().unwrap_or("N/A")
    );
    println!(
        "Description: {}",
        effect.attributes.description.as_deref().unwrap_or("N/A")
    );
    println!(
        "Image:       {}",
        effect.attributes.image.as_deref().unwrap_or("N/A")
    );
    println!("Uses Audio:  {}", effect.attributes.uses_audio);
    println!("Uses Video:  {}", effect.attributes.uses_video);
    println!("Uses Input:  {}", effect.attributes.uses_input);
    println!("Uses Meters: {}", effect.attributes.uses_meters);

    if !effect.attributes.parameters.is_empty() {
        println!();
        println!("Parameters:");
        let mut parameters: Vec<_> = effect.attributes.parameters.iter().collect();
        parameters.sort_by_key(|(key, _)| key.to_string());
        let max_key_width = parameters.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in parameters {
            println!("  {key:<width$} {value}", width = max_key_width + 2);
        }
    }
}

fn print_presets_table(effect_name: &str, presets: &[EffectPreset]) {
    println!("Presets for effect: {effect_name}");
    for preset in presets {
        println!("  {}", preset.id);
    }
    println!("Total presets: {}", presets.len());
}

fn print_layouts_table(layouts: &[Layout]) {
    let max_id_width = layouts.iter().map(|l| l.id.len()).max().unwrap_or(0);
    println!("{:<width$} {}", "ID", "Type", width = max_id_width + 2);
    println!(
        "{:<width$} {}",
        "-".repeat(max_id_width),
        "----",
        width = max_id_width + 2,
    );
    for layout in layouts {
        println!("{:<width$} {}", layout.id, layout.kind, width = max_id_width + 2);
    }
    println!("Total layouts: {}", layouts.len());
}

fn print_error_hint(err: &SignalRgbError) {
    match err {
        SignalRgbError::Connection { .. } => {
            eprintln!("Please check your network connection and SignalRGB server status.");
        }
        SignalRgbError::NotFound { .. } => {
            eprintln!("The specified item was not found. Please check the name or ID.");
        }
        SignalRgbError::Api { .. } => {
            eprintln!("An API error occurred. Please try again later.");
        }
        SignalRgbError::Unexpected { .. } => {}
    }
}
