use clap::Subcommand;
use std::path::PathBuf;

pub mod install;
pub mod installfile;
pub mod list;
pub mod publish;
pub mod yeet;

#[derive(Subcommand)]
pub enum Commands {
    /// List mods in the catalog
    List {
        /// Only list mods whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only list installed mods
        #[arg(short, long)]
        installed: bool,

        /// Show version, repository, dependencies and description
        #[arg(short, long)]
        detailed: bool,
    },

    /// Install mods and their dependencies from the catalog
    Install {
        /// Mod names; any unambiguous part of a name will do
        #[arg(required = true)]
        mods: Vec<String>,
    },

    /// Install a mod file from a path or URL, bypassing the catalog
    #[command(name = "installfile")]
    InstallFile {
        /// Name to install the mod under
        name: String,

        /// Local path or http(s) URL of the mod file
        source: String,
    },

    /// Remove installed mods
    Yeet {
        /// Installed mod names; any unambiguous part of a name will do
        #[arg(required = true)]
        mods: Vec<String>,
    },

    /// Add or update a mod in a ModLinks file
    Publish {
        /// The mod file that will be published
        #[arg(long)]
        url: String,

        /// Path to the ModLinks file
        #[arg(long, default_value = "ModLinks.xml")]
        modlinks: PathBuf,

        /// The name of the mod (determined from the URL if not specified)
        #[arg(long)]
        name: Option<String>,

        /// The version of the mod (determined from the URL if not specified)
        #[arg(long)]
        version: Option<String>,

        /// The description
        #[arg(long = "desc")]
        description: Option<String>,

        /// Dependencies separated by commas ('none' to remove all dependencies when updating)
        #[arg(long = "deps")]
        dependencies: Option<String>,

        /// The URL of the mod's repository
        #[arg(long = "repo")]
        repository: Option<String>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List {
                search,
                installed,
                detailed,
            } => list::execute(search.as_deref(), *installed, *detailed),
            Commands::Install { mods } => install::execute(mods),
            Commands::InstallFile { name, source } => installfile::execute(name, source),
            Commands::Yeet { mods } => yeet::execute(mods),
            Commands::Publish {
                url,
                modlinks,
                name,
                version,
                description,
                dependencies,
                repository,
            } => publish::execute(&crate::operations::PublishOptions {
                url: url.clone(),
                modlinks_path: modlinks.clone(),
                name: name.clone(),
                version: version.clone(),
                description: description.clone(),
                dependencies: dependencies.clone(),
                repository: repository.clone(),
            }),
        }
    }
}
