// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

mod command;
mod config;
mod io;
mod settings;

pub(crate) use command::Command;

use std::fs;

use clap::Parser;
use tracing::{Level, error};

use crate::settings::{LogFormat, Settings};

use sflow_client::{Client, Error};

use config::Config;
use io::{ClientArgs, status};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = exec().await {
        // display the error message (if any)
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn exec() -> anyhow::Result<()> {
    // parse user args
    let args = ClientArgs::parse();
    let cmd = args.command.clone();

    // Get the initial settings from the args
    let settings_builder = Settings::args(args)?;

    // Obtain the profile dir from the settings
    let profile_folder = settings_builder.profile().clone();

    fs::create_dir_all(profile_folder.as_path())?;

    // load configuration (or use default)
    let cfg = Config::load(&profile_folder)?;

    // Finally complete the settings by setting the network
    let settings = settings_builder.network(cfg.network)?;

    // generate a subscriber with the desired log level
    let level = &settings.logging.level;
    let level: Level = level.into();
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    // set the subscriber as global
    match settings.logging.format {
        LogFormat::Json => {
            let subscriber = subscriber.json().flatten_event(true).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Plain => {
            let subscriber = subscriber.with_ansi(false).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Coloured => {
            let subscriber = subscriber.finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    };

    if let Command::Settings = cmd {
        println!("{}", &settings);
        return Ok(());
    };

    if cmd.submits() {
        if let Err(e) = settings.check_access_con().await {
            error!("Unable to reach the access node at {}", settings.access);
            return Err(e.into());
        }
    }

    let client =
        Client::connect(settings.access.as_str(), settings.contracts.clone())?
            .with_poll_interval(settings.poll_interval)
            .with_seal_timeout(settings.seal_timeout)
            .with_status(status::printer());

    match cmd.run(&client, &settings).await {
        Ok(result) => {
            println!("{result}");
            Ok(())
        }
        Err(err) => {
            if let Some(err) = err.downcast_ref::<Error>() {
                error!(kind = ?err.kind(), "{err}");
            }
            Err(err)
        }
    }
}
