extern crate getopts;

use std::env;
use std::fs::File;
use std::io;
use std::io::prelude::*;

use serde_json;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Getopts(err: getopts::Fail) { from() }
        Io(err: io::Error) { from() }
        Serde(err: serde_json::Error) { from() }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct BotConfig {
    pub nickname: String,
    pub status: String,
}

impl Default for BotConfig {
    fn default() -> BotConfig {
        BotConfig {
            nickname: "jukebot".to_owned(),
            status: String::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct PlayerConfig {
    pub default_volume: u8,
    pub seek_step: f64,
}

impl Default for PlayerConfig {
    fn default() -> PlayerConfig {
        PlayerConfig {
            default_volume: 50,
            seek_step: 5.0,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub search_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UsersConfig {
    pub admins: Vec<String>,
    pub banned: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub player: PlayerConfig,
    pub service: ServiceConfig,
    pub users: UsersConfig,
}

pub struct Settings {
    pub config: Config,
    pub username: String,
}

pub enum ConfigResult {
    Some(Settings),
    Help,
    Err(Error),
}

const USAGE: &'static str = "Usage: jukebot [options]";

fn create_opts() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt("c", "config", "specify config file. Built-in defaults \
        apply when no file is given", "CONFIG");
    opts.optopt("u", "user", "console username, checked against the \
        configured admin and ban lists", "USER");
    opts
}

pub fn write_help<T: io::Write>(out: &mut T) -> io::Result<()> {
    write!(out, "{}", create_opts().usage(USAGE))
}

pub fn read_config() -> ConfigResult {
    let matches = match create_opts().parse(env::args().skip(1)) {
        Ok(matches) => matches,
        Err(err) => return ConfigResult::Err(err.into()),
    };

    if matches.opt_present("h") {
        return ConfigResult::Help;
    }

    let config = match matches.opt_str("config") {
        Some(path) => match read_config_from_file(&path) {
            Ok(config) => config,
            Err(err) => return ConfigResult::Err(err),
        },
        None => Config::default(),
    };

    ConfigResult::Some(Settings {
        config: config,
        username: matches.opt_str("user").unwrap_or("operator".to_owned()),
    })
}

fn read_config_from_file(filename: &str) -> Result<Config, Error> {
    let mut f = File::open(filename)?;
    let mut buffer = String::new();
    f.read_to_string(&mut buffer)?;
    Ok(serde_json::from_str(&buffer)?)
}
