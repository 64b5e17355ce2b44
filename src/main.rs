//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use rivermap_core::core::palette::{palette_names, Palette};
use rivermap_service::runtime_config::{self, RUN_ARGS};
use std::env;
use std::io::Write;
use std::process;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log = match (args.value_of("loglevel"), env::var("RUST_LOG")) {
        (None, Ok(env_log)) => env_log,
        (Some("debug"), _) => "debug,tera=info".to_string(),
        (loglevel, _) => loglevel.unwrap_or("info").to_string(),
    };
    builder.parse_filters(&rust_log);

    builder.init();
}

fn run(args: &ArgMatches<'_>) -> rivermap_core::Result<()> {
    let config = runtime_config::config_from_args(args)?;
    let opts = runtime_config::options_from_args(args, &config)?;
    let service = runtime_config::service_from_args(config)?;
    let written = service.run(&opts)?;
    info!("{} map files written", written.len());
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn list_palettes() -> rivermap_core::Result<()> {
    for name in palette_names() {
        let palette = Palette::by_name(name)?;
        let hexes: Vec<String> = palette.colours.iter().map(|c| c.hex()).collect();
        println!("{:<14} {}", name, hexes.join(" "));
    }
    Ok(())
}

fn main() {
    dotenv().ok();
    let mut app = App::new("rivermap")
        .version(crate_version!())
        .author("rivermap contributors")
        .about("Coloured river network and drainage basin maps of the island of Ireland")
        .subcommand(
            SubCommand::with_name("run")
                .args_from_usage(RUN_ARGS)
                .about("Download datasets and render maps"),
        )
        .subcommand(
            SubCommand::with_name("genconfig")
                .args_from_usage(
                    "--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'",
                )
                .about("Generate configuration template"),
        )
        .subcommand(SubCommand::with_name("palettes").about("List available colour schemes"));

    let result = match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        // Exits with status 1 on invalid arguments, 0 for --help and --version
        Err(e) => e.exit(),
        Ok(matches) => match matches.subcommand() {
            ("run", Some(sub_m)) => {
                init_logger(sub_m);
                run(sub_m)
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", runtime_config::gen_config());
                Ok(())
            }
            ("palettes", Some(_)) => list_palettes(),
            _ => {
                let _ = app.print_help();
                println!();
                Ok(())
            }
        },
    };
    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
