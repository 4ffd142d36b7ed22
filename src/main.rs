//! kubectl-switch - Main entry point

use clap::Parser;
use log::{debug, error};

use kubectl_switch::{
    config, kubeconfig, Aggregator, Cli, Command, DuplicatePolicy, KubectlLister, Manager, Result,
};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .format_timestamp(None)
        .init();

    debug!(
        "CLI args: kubeconfig={:?}, kubeconfig_dir={:?}, strict={}",
        cli.kubeconfig, cli.kubeconfig_dir, cli.strict
    );

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let manager = Manager::new(config::resolve_kubeconfig_path(cli.kubeconfig.as_deref()));
    let policy = if cli.strict {
        DuplicatePolicy::Fail
    } else {
        DuplicatePolicy::Skip
    };

    match &cli.command {
        Command::Context(args) => {
            if args.name.as_deref() == Some("-") {
                return kubeconfig::run_restore(&manager);
            }
            let dir = config::resolve_config_dir(cli.kubeconfig_dir.as_deref())?;
            let aggregator = Aggregator::new(dir, policy);
            kubeconfig::run_context_switch(&aggregator, &manager, args.name.as_deref())
        }
        Command::Namespace(args) => {
            if args.name.as_deref() == Some("-") {
                return kubeconfig::run_restore(&manager);
            }
            let lister = KubectlLister::new(manager.kubeconfig_path().to_path_buf());
            kubeconfig::run_namespace_switch(&manager, &lister, args.name.as_deref())
        }
        Command::List(args) => {
            let dir = config::resolve_config_dir(cli.kubeconfig_dir.as_deref())?;
            let aggregator = Aggregator::new(dir, policy);
            kubeconfig::run_list(&aggregator, &manager, args.output)
        }
    }
}
