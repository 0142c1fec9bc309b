use clap::Parser;
use goingenv::cli::commands::{init, list, pack, status, unpack};
use goingenv::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => init::execute(force),
        Commands::Status => status::execute(),
        Commands::Pack {
            ref directory,
            ref output,
            depth,
            ref include,
            ref exclude,
            ref description,
            dry_run,
            yes,
            ref password_env,
            verbose,
        } => pack::execute(&pack::PackArgs {
            directory: directory.clone(),
            output: output.clone(),
            depth,
            include: include.clone(),
            exclude: exclude.clone(),
            description: description.clone(),
            dry_run,
            yes,
            password_env: password_env.clone(),
            verbose,
        }),
        Commands::Unpack {
            ref file,
            ref target,
            overwrite,
            backup,
            ref password_env,
            verbose,
        } => unpack::execute(&unpack::UnpackArgs {
            file: file.clone(),
            target: target.clone(),
            overwrite,
            backup,
            password_env: password_env.clone(),
            verbose,
        }),
        Commands::List {
            ref file,
            all,
            ref password_env,
        } => list::execute(&list::ListArgs {
            file: file.clone(),
            all,
            password_env: password_env.clone(),
        }),
    };

    if let Err(e) = result {
        goingenv::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
