#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
#[macro_use] extern crate quick_error;
#[macro_use] extern crate serde_derive;
extern crate env_logger;
extern crate itertools;
extern crate serde;
extern crate serde_json;

mod cmd;
mod config;
mod console;
mod player;
mod services;
mod tt;

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tt::Client;

fn run(settings: config::Settings) {
    let tt = console::Console::new(settings.username, &settings.config.users);
    let player = Mutex::new(player::Player::new(
        settings.config.player.default_volume,
        settings.config.player.seek_step,
    ));
    let service = services::Resolver::new(settings.config.service.search_url.clone());
    let lock = cmd::SessionLock::new();
    let running = AtomicBool::new(true);
    let processor = cmd::CommandProcessor::new();

    if let Err(err) = tt.change_nickname(&settings.config.bot.nickname) {
        warn!("could not set nickname: {:?}", err);
    }
    if !settings.config.bot.status.is_empty() {
        if let Err(err) = tt.change_status(&settings.config.bot.status) {
            warn!("could not set status: {:?}", err);
        }
    }

    // One message at a time, to completion, then wait for the next one.
    while running.load(Ordering::SeqCst) {
        let message = match tt.next_message() {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                error!("transport failed: {:?}", err);
                break;
            }
        };

        info!("{}: {}", message.user.username, message.text);

        let reply = processor.dispatch(
            &cmd::CommandContext {
                player: &player,
                service: &service,
                tt: &tt,
                lock: &lock,
                running: &running,
            },
            &message,
        );

        if !reply.is_empty() {
            if let Err(err) = tt.reply(&message, &reply) {
                error!("could not send reply: {:?}", err);
            }
        }
    }
}

fn main() {
    env_logger::init();

    match config::read_config() {
        config::ConfigResult::Some(settings) => run(settings),
        config::ConfigResult::Help => {
            config::write_help(&mut std::io::stdout()).unwrap();
        }
        config::ConfigResult::Err(err) => {
            println!("{:?}", &err);
            panic!("invalid configuration")
        }
    }
}
