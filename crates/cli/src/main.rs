use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use testbed_core::orchestrator::{Orchestrator, OrchestratorConfig, RunOptions};

mod commands;

/// Testbed - CMS extension end-to-end test orchestrator
#[derive(Parser)]
#[command(name = "testbed")]
#[command(about = "Orchestrates end-to-end testing of a CMS extension")]
#[command(version)]
struct Cli {
    /// Base path where tests are executed (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    base_path: PathBuf,

    /// Configuration file (defaults to testbed.toml under the base path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the environment and run the install suite
    Prepare {
        /// Environment to get suite configuration from
        #[arg(long, default_value = "desktop")]
        env: String,
        /// Execute Codeception with extended debug
        #[arg(long)]
        debug: bool,
        /// Rename and enable the embedded .htaccess file
        #[arg(long)]
        use_htaccess: bool,
        /// Path with extra certificates to append
        #[arg(long, default_value = "")]
        append_certificates: String,
        /// Installation suite to run after preparation
        #[arg(long, default_value = "acceptance")]
        install_suite: String,
        /// Installation test to run after preparation
        #[arg(long, default_value = "install")]
        install_test: String,
    },
    /// Run the whole test script for the extension
    RunTests {
        #[arg(long, default_value = "desktop")]
        env: String,
        #[arg(long)]
        debug: bool,
        #[arg(long)]
        use_htaccess: bool,
        #[arg(long, default_value = "")]
        append_certificates: String,
    },
    /// Create a testing CMS site for running the tests
    CreateSite {
        #[arg(long)]
        use_htaccess: bool,
        #[arg(long, default_value = "")]
        append_certificates: String,
    },
    /// Run the Selenium standalone server
    RunSelenium {
        /// Run the server in debug mode
        #[arg(long)]
        debug: bool,
    },
    /// Stop the Selenium standalone server
    KillSelenium,
    /// Build the Codeception tester classes
    CodeceptBuild,
    /// Run a Codeception suite
    RunSuite {
        /// Codeception suite to run
        suite: String,
        /// Codeception test to run
        test: String,
        #[arg(long, default_value = "")]
        env: String,
        #[arg(long)]
        debug: bool,
    },
    /// Check the code style of the extension
    CheckCodestyle {
        /// Path to the coding standard sniffers
        #[arg(long)]
        standards_path: Option<PathBuf>,
        /// Folders to check, relative to the base path
        #[arg(long, default_values_t = vec!["src".to_string()])]
        folders: Vec<String>,
    },
    /// Publish screenshots and a results comment to the Github PR
    Report {
        /// Comment body to post on the pull request
        #[arg(long)]
        comment: String,
        /// Local image paths to upload
        #[arg(long)]
        images: Vec<String>,
        /// Local folder searched for images to upload
        #[arg(long, default_value = "")]
        images_folder: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the orchestrator with all business logic
    let orchestrator = Orchestrator::new(OrchestratorConfig {
        base_path: cli.base_path,
        config_file: cli.config,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize testbed: {}", e))?;

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::Prepare {
            env,
            debug,
            use_htaccess,
            append_certificates,
            install_suite,
            install_test,
        } => commands::prepare::execute(
            &orchestrator,
            RunOptions {
                env,
                debug,
                use_htaccess,
                append_certificates,
                install_suite,
                install_test,
            },
        ),
        Commands::RunTests {
            env,
            debug,
            use_htaccess,
            append_certificates,
        } => commands::run_tests::execute(
            &orchestrator,
            RunOptions {
                env,
                debug,
                use_htaccess,
                append_certificates,
                ..RunOptions::default()
            },
        ),
        Commands::CreateSite {
            use_htaccess,
            append_certificates,
        } => commands::create_site::execute(&orchestrator, use_htaccess, &append_certificates),
        Commands::RunSelenium { debug } => commands::selenium::run(&orchestrator, debug),
        Commands::KillSelenium => commands::selenium::kill(&orchestrator),
        Commands::CodeceptBuild => commands::codecept::build(&orchestrator),
        Commands::RunSuite {
            suite,
            test,
            env,
            debug,
        } => commands::codecept::run_suite(&orchestrator, &suite, &test, debug, &env),
        Commands::CheckCodestyle {
            standards_path,
            folders,
        } => commands::codestyle::execute(&orchestrator, standards_path, folders),
        Commands::Report {
            comment,
            images,
            images_folder,
        } => commands::report::execute(&orchestrator, &comment, images, &images_folder),
    }
}
