use std::sync::atomic::Ordering;

use itertools::Itertools;

use player;
use tt;

use super::command_context::CommandContext;
use super::error::*;
use super::response::Response;

pub trait Command {
    fn help(&self) -> Option<&'static str> {
        None
    }

    fn call(&self, ctx: &CommandContext, args: &str, user: &tt::User) -> Result<Response, Error>;
}

pub struct CommandEntry {
    pub token: &'static str,
    pub handler: Box<Command>,
    pub hidden: bool,
}

fn entry(token: &'static str, handler: Box<Command>) -> CommandEntry {
    CommandEntry {
        token: token,
        handler: handler,
        hidden: false,
    }
}

fn hidden_entry(token: &'static str, handler: Box<Command>) -> CommandEntry {
    CommandEntry {
        token: token,
        handler: handler,
        hidden: true,
    }
}

struct HelpCommand;

impl Command for HelpCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shows help for a command, or lists every command")
    }

    fn call(&self, _ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            Ok(Response::Help(None))
        } else {
            Ok(Response::Help(Some(args.to_string())))
        }
    }
}

struct AboutCommand;

impl Command for AboutCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shows information about this bot")
    }

    fn call(&self, _ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        Ok(Response::Text(format!(
            "{} {}\nA media player living in your voice chat",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )))
    }
}

fn status_label(status: player::Status) -> &'static str {
    match status {
        player::Status::Playing => "Playing",
        player::Status::Paused => "Paused",
        player::Status::Stopped => "Stopped",
    }
}

struct PlayPauseCommand;

impl Command for PlayPauseCommand {
    fn help(&self) -> Option<&'static str> {
        Some("pauses or resumes playback")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let status = ctx.player.lock()?.play_pause()?;
        Ok(Response::Text(status_label(status).to_string()))
    }
}

struct PlayUrlCommand;

impl Command for PlayUrlCommand {
    fn help(&self) -> Option<&'static str> {
        Some("plays a stream from a direct URL")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            return Err(Error::MissingArgument("url"));
        }
        if !args.starts_with("http://") && !args.starts_with("https://") {
            return Err(Error::InvalidArgument);
        }
        let tracks = ctx.service.resolve(args)?;
        let track = ctx.player.lock()?.play(tracks)?;
        Ok(Response::Text(format!("Playing {}", track.name)))
    }
}

struct ServiceCommand;

impl Command for ServiceCommand {
    fn help(&self) -> Option<&'static str> {
        Some("searches the audio service and plays what it finds")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            return Err(Error::MissingArgument("query"));
        }
        let tracks = ctx.service.resolve(args)?;
        let track = ctx.player.lock()?.play(tracks)?;
        Ok(Response::Text(format!("Playing {}", track.name)))
    }
}

struct StopCommand;

impl Command for StopCommand {
    fn help(&self) -> Option<&'static str> {
        Some("stops playback and clears the track list")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        ctx.player.lock()?.stop();
        Ok(Response::Text("Stopped".to_string()))
    }
}

struct PreviousTrackCommand;

impl Command for PreviousTrackCommand {
    fn help(&self) -> Option<&'static str> {
        Some("switches to the previous track")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let track = ctx.player.lock()?.previous()?;
        Ok(Response::Text(track.name))
    }
}

struct NextTrackCommand;

impl Command for NextTrackCommand {
    fn help(&self) -> Option<&'static str> {
        Some("switches to the next track")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let track = ctx.player.lock()?.next()?;
        Ok(Response::Text(track.name))
    }
}

struct SelectTrackCommand;

impl Command for SelectTrackCommand {
    fn help(&self) -> Option<&'static str> {
        Some("selects a track by its number")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        let number = args.trim().parse::<usize>()?;
        let track = ctx.player.lock()?.select_track(number)?;
        Ok(Response::Text(track.name))
    }
}

fn parse_seek_step(args: &str) -> Result<Option<f64>, Error> {
    if args.is_empty() {
        return Ok(None);
    }
    let seconds = args.trim().parse::<f64>()?;
    if !(seconds > 0.0) {
        return Err(Error::InvalidArgument);
    }
    Ok(Some(seconds))
}

struct SeekBackCommand;

impl Command for SeekBackCommand {
    fn help(&self) -> Option<&'static str> {
        Some("seeks back, by the given number of seconds or the default step")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        let position = ctx.player.lock()?.seek_back(parse_seek_step(args)?)?;
        Ok(Response::Text(format!("Position: {}s", position)))
    }
}

struct SeekForwardCommand;

impl Command for SeekForwardCommand {
    fn help(&self) -> Option<&'static str> {
        Some("seeks forward, by the given number of seconds or the default step")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        let position = ctx.player.lock()?.seek_forward(parse_seek_step(args)?)?;
        Ok(Response::Text(format!("Position: {}s", position)))
    }
}

struct VolumeCommand;

impl Command for VolumeCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shows the volume, or sets it to a value between 0 and 100")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            let player = ctx.player.lock()?;
            return Ok(Response::Text(format!("Volume: {}", player.volume())));
        }
        let value = args.trim().parse::<u32>()?;
        let volume = ctx.player.lock()?.set_volume(value)?;
        Ok(Response::Text(format!("Volume set to {}", volume)))
    }
}

struct ModeCommand;

impl Command for ModeCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shows the playback mode, or sets it by name")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            let player = ctx.player.lock()?;
            return Ok(Response::Text(format!(
                "Playback mode: {}\nAvailable modes: {}",
                player.mode().name(),
                player::MODES.iter().map(|mode| mode.name()).join(", ")
            )));
        }
        let mode = player::Mode::from_name(args.trim()).ok_or(Error::InvalidArgument)?;
        ctx.player.lock()?.set_mode(mode);
        Ok(Response::Text(format!("Playback mode: {}", mode.name())))
    }
}

struct GetLinkCommand;

impl Command for GetLinkCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shows a link to the current track")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let track = ctx.player.lock()?.current_track()?;
        Ok(Response::Text(track.url))
    }
}

struct XyzzyCommand;

impl Command for XyzzyCommand {
    fn call(&self, _ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        Ok(Response::Text("Nothing happens.".to_string()))
    }
}

struct ChangeNicknameCommand;

impl Command for ChangeNicknameCommand {
    fn help(&self) -> Option<&'static str> {
        Some("changes the bot's nickname")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        if args.is_empty() {
            return Err(Error::MissingArgument("nickname"));
        }
        ctx.tt.change_nickname(args)?;
        Ok(Response::Text("Nickname changed".to_string()))
    }
}

struct ChangeStatusCommand;

impl Command for ChangeStatusCommand {
    fn help(&self) -> Option<&'static str> {
        Some("changes the bot's status text, or clears it")
    }

    fn call(&self, ctx: &CommandContext, args: &str, _user: &tt::User) -> Result<Response, Error> {
        ctx.tt.change_status(args)?;
        Ok(Response::Text("Status changed".to_string()))
    }
}

struct LockCommand;

impl Command for LockCommand {
    fn help(&self) -> Option<&'static str> {
        Some("locks or unlocks the bot for everyone but admins")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let reply = if ctx.lock.toggle() {
            "Locked"
        } else {
            "Unlocked"
        };
        Ok(Response::Text(reply.to_string()))
    }
}

struct VoiceTransmissionCommand;

impl Command for VoiceTransmissionCommand {
    fn help(&self) -> Option<&'static str> {
        Some("toggles voice transmission")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        let reply = if ctx.tt.toggle_voice_transmission()? {
            "Voice transmission enabled"
        } else {
            "Voice transmission disabled"
        };
        Ok(Response::Text(reply.to_string()))
    }
}

struct QuitCommand;

impl Command for QuitCommand {
    fn help(&self) -> Option<&'static str> {
        Some("shuts the bot down")
    }

    fn call(&self, ctx: &CommandContext, _args: &str, _user: &tt::User) -> Result<Response, Error> {
        ctx.running.store(false, Ordering::SeqCst);
        Ok(Response::Empty)
    }
}

pub fn commands() -> Vec<CommandEntry> {
    vec![
        entry("h", Box::new(HelpCommand)),
        entry("a", Box::new(AboutCommand)),
        entry("p", Box::new(PlayPauseCommand)),
        entry("u", Box::new(PlayUrlCommand)),
        entry("sv", Box::new(ServiceCommand)),
        entry("s", Box::new(StopCommand)),
        entry("b", Box::new(PreviousTrackCommand)),
        entry("n", Box::new(NextTrackCommand)),
        entry("c", Box::new(SelectTrackCommand)),
        entry("sb", Box::new(SeekBackCommand)),
        entry("sf", Box::new(SeekForwardCommand)),
        entry("v", Box::new(VolumeCommand)),
        entry("m", Box::new(ModeCommand)),
        entry("gl", Box::new(GetLinkCommand)),
    ]
}

pub fn admin_commands() -> Vec<CommandEntry> {
    vec![
        hidden_entry("xyzzy", Box::new(XyzzyCommand)),
        entry("cn", Box::new(ChangeNicknameCommand)),
        entry("cs", Box::new(ChangeStatusCommand)),
        entry("l", Box::new(LockCommand)),
        entry("va", Box::new(VoiceTransmissionCommand)),
        entry("q", Box::new(QuitCommand)),
    ]
}
