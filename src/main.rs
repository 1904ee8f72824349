// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use sky_cms::database::models::{TagRecord, TranslatableText};
use sky_cms::database::{DatabaseConnection, Repository};
use sky_cms::locale::{language_name, normalize_locale, LocaleContext};
use sky_cms::plugin::{LogLevel, SkyConfig, SkyPlugin};
use sky_cms::registry::ModelRegistry;
use sky_cms::slug::{slugify, validate_slug};
use sky_cms::store::RecordStore;
use sky_cms::validation::{RuleOutcome, UniqueTranslationRule};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database
    Init,

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },

    /// Check whether a value is already taken in a locale
    Check(CheckArgs),

    /// Print enabled resources and option lists
    Resources,

    /// Generate shell completions for sky
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    /// Add a tag after checking its slug is free in the locale
    Add(TagAddArgs),

    /// List tags
    List {
        /// Only list tags of this type
        #[arg(long = "type")]
        tag_type: Option<String>,

        /// Locale to display names in
        #[arg(long)]
        locale: Option<String>,
    },
}

#[derive(Parser, Debug)]
struct TagAddArgs {
    /// Tag name
    #[arg(long)]
    name: String,

    /// Tag slug (derived from the name when omitted)
    #[arg(long)]
    slug: Option<String>,

    /// Locale the name and slug are written in
    #[arg(long)]
    locale: Option<String>,

    /// Tag type (e.g. 'tag', 'category')
    #[arg(long = "type", default_value = "tag")]
    tag_type: String,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Model tag (e.g. 'Tag', 'Post')
    #[arg(short, long)]
    model: String,

    /// Attribute path (e.g. 'slug', 'data.slug')
    #[arg(short, long)]
    attribute: String,

    /// Candidate value
    #[arg(long)]
    value: String,

    /// Active locale (defaults to the configured locale)
    #[arg(long)]
    locale: Option<String>,

    /// Key of the record being edited
    #[arg(short, long)]
    record: Option<i64>,

    /// Count the edited record itself as a duplicate
    #[arg(long)]
    no_ignore: bool,
}

/// Sky - translatable content with locale-scoped uniqueness
#[derive(Parser, Debug)]
#[command(name = "sky")]
#[command(version)]
#[command(about = "Translatable content store with locale-scoped uniqueness checks")]
#[command(long_about = "Sky stores posts, pages, tags, FAQs, library items and navigations whose
text attributes hold one value per locale, and checks that values stay unique per locale.

EXAMPLES:
    sky init                                             # Create the database
    sky tag add --name News --locale en                  # Add a tag with slug 'news'
    sky tag list --type category                         # List category tags
    sky check -m Tag -a slug --value news --locale en    # Exit status 1 when taken
    sky check -m Tag -a slug --value news -r 3           # Ignore record 3 (editing it)
    sky resources                                        # Show plugin resources
    sky completions bash > sky.bash                      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: String,

    /// Database file path
    #[arg(short, long, env = "SKY_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
// Filtering follows `log::max_level`, which is raised or lowered once the
// config is loaded.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<ExitCode> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "sky", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let cli_level: Option<LogLevel> = cli.log_level.clone().map(Into::into);
    if let Some(level) = cli_level {
        log::set_max_level(level.to_level_filter());
    }

    let mut config = SkyConfig::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config file: {}", cli.config_path))?;
    if let Some(level) = cli_level {
        config.log_level = level;
    }
    config
        .validate()
        .context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());
    let plugin = SkyPlugin::from_config(&config);

    if let Commands::Resources = &cli.command {
        print_resources(&plugin);
        return Ok(ExitCode::SUCCESS);
    }

    let db_path = match cli.database.clone().or_else(|| config.database_path.clone()) {
        Some(path) => path,
        None => DatabaseConnection::default_database_path()?,
    };
    let repository = Arc::new(Repository::new(DatabaseConnection::new(&db_path)?));

    match cli.command {
        Commands::Init => {
            let stats = repository.connection().stats()?;
            info!("Database ready at {:?}", repository.connection().path());
            println!("{}", stats);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tag { action: TagCommand::Add(args) } => run_tag_add(&config, &plugin, repository, args),
        Commands::Tag {
            action: TagCommand::List { tag_type, locale },
        } => {
            let locale = locale.unwrap_or_else(|| config.default_locale.clone());
            for tag in repository.list_tags(tag_type.as_deref())? {
                println!(
                    "{:>4}  {:<10} {:<24} {}",
                    tag.id,
                    tag.tag_type,
                    tag.name.get(&locale).unwrap_or("-"),
                    tag.slug.get(&locale).unwrap_or("-")
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(args) => run_check(&config, &plugin, repository, args),
        Commands::Resources | Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn registry_for(plugin: &SkyPlugin, repository: Arc<Repository>) -> Result<ModelRegistry> {
    let store: Arc<dyn RecordStore> = repository;
    ModelRegistry::with_overrides(store, plugin.get_models()).context("Invalid model configuration")
}

fn run_check(
    config: &SkyConfig,
    plugin: &SkyPlugin,
    repository: Arc<Repository>,
    args: CheckArgs,
) -> Result<ExitCode> {
    let registry = registry_for(plugin, repository)?;
    let rule = UniqueTranslationRule::for_model(&registry, &args.model, args.record)?
        .ignore_record(!args.no_ignore);

    let mut locale = LocaleContext::new(config.default_locale.clone());
    if let Some(active) = args.locale {
        locale = locale.with_active(active);
    }

    match rule.validate(&args.attribute, &Value::String(args.value), &locale)? {
        RuleOutcome::Passed => {
            println!("OK");
            Ok(ExitCode::SUCCESS)
        }
        RuleOutcome::Duplicate { message, .. } => {
            println!("{}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_tag_add(
    config: &SkyConfig,
    plugin: &SkyPlugin,
    repository: Arc<Repository>,
    args: TagAddArgs,
) -> Result<ExitCode> {
    let locale = normalize_locale(args.locale.as_deref().unwrap_or(&config.default_locale))?;
    let slug = args.slug.unwrap_or_else(|| slugify(&args.name));
    validate_slug(&slug)?;

    let tag_types = plugin.get_tag_types();
    if !tag_types.contains_key(&args.tag_type) {
        return Err(anyhow!(
            "Unknown tag type '{}'. Available types: {}",
            args.tag_type,
            tag_types.keys().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    let registry = registry_for(plugin, repository.clone())?;
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None)?;
    let outcome = rule.validate("slug", &Value::String(slug.clone()), &LocaleContext::new(locale.clone()))?;
    if let RuleOutcome::Duplicate { message, .. } = outcome {
        println!("{}", message);
        return Ok(ExitCode::FAILURE);
    }

    let tag = TagRecord::new(
        TranslatableText::single(locale.clone(), args.name),
        TranslatableText::single(locale.clone(), slug.clone()),
        args.tag_type,
    );
    let id = repository.create_tag(&tag)?;

    debug!(
        "Created tag {} in {}",
        id,
        language_name(&locale).unwrap_or_else(|| locale.clone())
    );
    println!("Created tag {} with slug '{}' ({})", id, slug, locale);
    Ok(ExitCode::SUCCESS)
}

fn print_resources(plugin: &SkyPlugin) {
    println!("{} ({})", plugin.get_navigation_group_label(), plugin.id());

    println!("\nResources:");
    for resource in plugin.enabled_resources() {
        println!("  {}", resource);
    }

    println!("\nLibrary types:");
    for (key, label) in plugin.get_library_types().iter() {
        println!("  {:<10} {}", key, label);
    }

    println!("\nTag types:");
    for (key, label) in plugin.get_tag_types().iter() {
        println!("  {:<10} {}", key, label);
    }

    let uploads = plugin.get_uploads();
    println!("\nUploads: {}:{}", uploads.disk, uploads.directory);

    println!("\nNavigation item types:");
    for (key, item_type) in plugin.item_types() {
        let fields: Vec<&str> = item_type.fields.iter().map(|f| f.name.as_str()).collect();
        println!("  {:<16} {} [{}]", key, item_type.name, fields.join(", "));
    }
}
