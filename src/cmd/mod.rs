extern crate regex;

mod command_context;
mod commands;
mod error;
mod response;

use std::sync::atomic::{AtomicBool, Ordering};

use itertools::Itertools;

use tt;

use self::commands::CommandEntry;
use self::regex::Regex;

pub use self::command_context::CommandContext;
pub use self::commands::Command;
pub use self::error::{Error, Kind};
pub use self::response::Response;

lazy_static! {
    static ref RE_COMMAND: Regex = Regex::new("[a-z]+").unwrap();
}

/// One process-wide flag. While set, everything short of admin commands
/// is turned away before command lookup.
pub struct SessionLock {
    locked: AtomicBool,
}

impl SessionLock {
    pub fn new() -> SessionLock {
        SessionLock {
            locked: AtomicBool::new(false),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.locked.fetch_xor(true, Ordering::SeqCst)
    }
}

/// Splits one message into a command token and the argument rest. The
/// token is the first run of lowercase letters in the lowercased first
/// space-delimited field; the argument keeps its original casing.
pub fn lex(text: &str) -> (Option<String>, String) {
    let mut fields = text.split(' ');
    let first = fields.next().unwrap_or("").to_lowercase();
    let token = RE_COMMAND
        .find(&first)
        .map(|found| found.as_str().to_string());
    let argument = fields.collect::<Vec<_>>().join(" ");
    (token, argument)
}

pub struct CommandProcessor {
    commands: Vec<CommandEntry>,
    admin_commands: Vec<CommandEntry>,
}

impl CommandProcessor {
    pub fn new() -> CommandProcessor {
        CommandProcessor {
            commands: commands::commands(),
            admin_commands: commands::admin_commands(),
        }
    }

    fn find(&self, token: &str, user: &tt::User) -> Option<&CommandEntry> {
        self.commands
            .iter()
            .find(|entry| entry.token == token)
            .or_else(|| {
                if user.is_admin {
                    self.admin_commands.iter().find(|entry| entry.token == token)
                } else {
                    None
                }
            })
    }

    pub fn dispatch(&self, ctx: &CommandContext, message: &tt::Message) -> String {
        let user = &message.user;

        if user.is_banned {
            return "You are banned".to_string();
        }
        if !user.is_admin {
            if user.channel_id != ctx.tt.my_channel_id() {
                return "You are not in bot's channel".to_string();
            }
            if ctx.lock.is_locked() {
                return "Bot is locked".to_string();
            }
        }

        let (token, argument) = lex(&message.text);
        let token = match token {
            Some(token) => token,
            None => return self.help("", user),
        };

        let entry = match self.find(&token, user) {
            Some(entry) => entry,
            None => return format!("Unknown command \"{}\"\n{}", token, self.help("", user)),
        };

        match entry.handler.call(ctx, &argument, user) {
            Ok(Response::Empty) => String::new(),
            Ok(Response::Text(text)) => text,
            Ok(Response::Help(requested)) => match requested {
                Some(ref requested) => self.help(requested, user),
                None => self.help("", user),
            },
            Err(err) => match err.kind() {
                Kind::InvalidArgument => self.help(&token, user),
                Kind::Unavailable => {
                    warn!("command {} unavailable: {:?}", token, err);
                    format!("Error: {}", err)
                }
                Kind::Internal => {
                    error!("command {} failed: {:?}", token, err);
                    format!("Error: {}", err)
                }
            },
        }
    }

    /// Renders help for one token, or the full listing for an empty
    /// token. Admin entries are invisible to non-admins, and entries
    /// flagged hidden stay out of the listing.
    pub fn help(&self, token: &str, user: &tt::User) -> String {
        if !token.is_empty() {
            if let Some(entry) = self.find(token, user) {
                return help_line(entry);
            }
            return format!("Unknown command \"{}\"\n{}", token, self.help("", user));
        }

        let mut entries = self.commands.iter().collect::<Vec<_>>();
        if user.is_admin {
            entries.extend(self.admin_commands.iter().filter(|entry| !entry.hidden));
        }
        entries.into_iter().map(help_line).join("\n")
    }
}

fn help_line(entry: &CommandEntry) -> String {
    match entry.handler.help() {
        Some(help) => format!("{} {}", entry.token, help),
        None => format!("{} Help text not found", entry.token),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use player::{Player, Track};
    use services::Resolver;
    use tt::{ChannelId, Client, Error as TtError, Message, User};

    use super::*;

    const BOT_CHANNEL: ChannelId = 42;

    struct FakeClient;

    impl Client for FakeClient {
        fn my_channel_id(&self) -> ChannelId {
            BOT_CHANNEL
        }

        fn next_message(&self) -> Result<Option<Message>, TtError> {
            Ok(None)
        }

        fn reply(&self, _to: &Message, _text: &str) -> Result<(), TtError> {
            Ok(())
        }

        fn change_nickname(&self, _nickname: &str) -> Result<(), TtError> {
            Ok(())
        }

        fn change_status(&self, _status: &str) -> Result<(), TtError> {
            Ok(())
        }

        fn toggle_voice_transmission(&self) -> Result<bool, TtError> {
            Ok(true)
        }
    }

    struct Fixture {
        player: Mutex<Player>,
        service: Resolver,
        tt: FakeClient,
        lock: SessionLock,
        running: AtomicBool,
        processor: CommandProcessor,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                player: Mutex::new(Player::new(50, 5.0)),
                service: Resolver::new(None),
                tt: FakeClient,
                lock: SessionLock::new(),
                running: AtomicBool::new(true),
                processor: CommandProcessor::new(),
            }
        }

        fn dispatch(&self, text: &str, user: &User) -> String {
            let ctx = CommandContext {
                player: &self.player,
                service: &self.service,
                tt: &self.tt,
                lock: &self.lock,
                running: &self.running,
            };
            self.processor.dispatch(
                &ctx,
                &Message {
                    text: text.to_string(),
                    user: user.clone(),
                },
            )
        }

        fn load_tracks(&self, count: usize) {
            let tracks = (0..count)
                .map(|i| Track {
                    name: format!("track {}", i + 1),
                    url: format!("http://example.com/{}.mp3", i + 1),
                })
                .collect();
            self.player.lock().unwrap().play(tracks).unwrap();
        }
    }

    fn listener() -> User {
        User {
            username: "listener".to_string(),
            is_admin: false,
            is_banned: false,
            channel_id: BOT_CHANNEL,
        }
    }

    fn admin() -> User {
        User {
            username: "operator".to_string(),
            is_admin: true,
            is_banned: false,
            channel_id: BOT_CHANNEL,
        }
    }

    #[test]
    fn banned_users_get_the_fixed_notice_no_matter_what() {
        let fixture = Fixture::new();
        let banned = User {
            is_banned: true,
            ..listener()
        };
        assert_eq!(fixture.dispatch("h", &banned), "You are banned");
        assert_eq!(fixture.dispatch("zzz", &banned), "You are banned");

        let banned_admin = User {
            is_banned: true,
            ..admin()
        };
        assert_eq!(fixture.dispatch("l", &banned_admin), "You are banned");
        assert!(!fixture.lock.is_locked());
    }

    #[test]
    fn users_outside_the_channel_are_turned_away_first() {
        let fixture = Fixture::new();
        fixture.lock.toggle();
        let outsider = User {
            channel_id: BOT_CHANNEL + 1,
            ..listener()
        };
        assert_eq!(fixture.dispatch("h", &outsider), "You are not in bot's channel");
        assert_eq!(fixture.dispatch("zzz", &outsider), "You are not in bot's channel");
    }

    #[test]
    fn admins_are_exempt_from_the_channel_check() {
        let fixture = Fixture::new();
        let remote_admin = User {
            channel_id: BOT_CHANNEL + 1,
            ..admin()
        };
        assert_eq!(fixture.dispatch("v", &remote_admin), "Volume: 50");
    }

    #[test]
    fn locked_bot_rejects_every_non_admin_input() {
        let fixture = Fixture::new();
        assert_eq!(fixture.dispatch("l", &admin()), "Locked");
        assert_eq!(fixture.dispatch("v", &listener()), "Bot is locked");
        assert_eq!(fixture.dispatch("zzz", &listener()), "Bot is locked");
        assert_eq!(fixture.dispatch("", &listener()), "Bot is locked");
        assert_eq!(fixture.dispatch("v", &admin()), "Volume: 50");
    }

    #[test]
    fn lock_toggles_back_and_forth() {
        let fixture = Fixture::new();
        assert_eq!(fixture.dispatch("l", &admin()), "Locked");
        assert!(fixture.lock.is_locked());
        assert_eq!(fixture.dispatch("l", &admin()), "Unlocked");
        assert!(!fixture.lock.is_locked());
    }

    #[test]
    fn lex_splits_token_and_argument() {
        assert_eq!(
            lex("u http://example.com/a.mp3"),
            (Some("u".to_string()), "http://example.com/a.mp3".to_string())
        );
        assert_eq!(lex("sv some Song Title"), (Some("sv".to_string()), "some Song Title".to_string()));
        assert_eq!(lex("p"), (Some("p".to_string()), String::new()));
    }

    #[test]
    fn lex_lowercases_and_extracts_the_first_letter_run() {
        assert_eq!(lex("V 80").0, Some("v".to_string()));
        assert_eq!(lex("!p").0, Some("p".to_string()));
        assert_eq!(lex("a1b").0, Some("a".to_string()));
        assert_eq!(lex("123").0, None);
        assert_eq!(lex("?!").0, None);
        assert_eq!(lex("").0, None);
        assert_eq!(lex("   ").0, None);
    }

    #[test]
    fn lex_is_stable_under_relexing() {
        for text in &["v 80", "sv a b  c", "!p x", "h", "  leading"] {
            let (token, argument) = lex(text);
            if let Some(token) = token {
                let relexed = lex(&format!("{} {}", token, argument));
                assert_eq!(relexed.0, Some(token));
            }
        }
    }

    #[test]
    fn every_public_help_line_starts_with_its_token() {
        let fixture = Fixture::new();
        for entry in &fixture.processor.commands {
            let line = fixture.processor.help(entry.token, &listener());
            assert!(
                line.starts_with(&format!("{} ", entry.token)),
                "bad help line: {}",
                line
            );
        }
    }

    #[test]
    fn unknown_commands_reply_with_the_full_help() {
        let fixture = Fixture::new();
        let reply = fixture.dispatch("zzz extra args", &listener());
        let expected_help = fixture.processor.help("", &listener());
        assert_eq!(reply, format!("Unknown command \"zzz\"\n{}", expected_help));
    }

    #[test]
    fn empty_messages_reply_with_the_general_help() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.dispatch("", &listener()),
            fixture.processor.help("", &listener())
        );
        assert_eq!(
            fixture.dispatch("   ", &admin()),
            fixture.processor.help("", &admin())
        );
    }

    #[test]
    fn admin_commands_are_invisible_to_ordinary_users() {
        let fixture = Fixture::new();
        let reply = fixture.dispatch("cn newname", &listener());
        assert!(reply.starts_with("Unknown command \"cn\""));
        assert_eq!(fixture.dispatch("cn newname", &admin()), "Nickname changed");
    }

    #[test]
    fn admin_help_lists_more_but_not_the_hidden_entry() {
        let fixture = Fixture::new();
        let public_help = fixture.processor.help("", &listener());
        let admin_help = fixture.processor.help("", &admin());
        assert!(!public_help.contains("\ncn "));
        assert!(admin_help.contains("\ncn "));
        assert!(!admin_help.contains("xyzzy"));
    }

    #[test]
    fn help_for_a_helpless_command_says_so() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.processor.help("xyzzy", &admin()),
            "xyzzy Help text not found"
        );
        assert!(
            fixture
                .processor
                .help("xyzzy", &listener())
                .starts_with("Unknown command \"xyzzy\"")
        );
    }

    #[test]
    fn invalid_arguments_recover_with_the_command_help_line() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.dispatch("v loud", &listener()),
            fixture.processor.help("v", &listener())
        );
        assert_eq!(
            fixture.dispatch("v 150", &listener()),
            fixture.processor.help("v", &listener())
        );
        assert_eq!(
            fixture.dispatch("c one", &listener()),
            fixture.processor.help("c", &listener())
        );
        assert_eq!(
            fixture.dispatch("u not-a-url", &listener()),
            fixture.processor.help("u", &listener())
        );
        assert_eq!(
            fixture.dispatch("sb -3", &listener()),
            fixture.processor.help("sb", &listener())
        );
    }

    #[test]
    fn other_failures_become_short_error_replies() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.dispatch("p", &listener()),
            "Error: Nothing is playing"
        );
        assert_eq!(
            fixture.dispatch("gl", &listener()),
            "Error: Nothing is playing"
        );
        assert_eq!(
            fixture.dispatch("sv some song", &listener()),
            "Error: No audio service is configured (service.search_url)"
        );
    }

    #[test]
    fn playback_commands_drive_the_shared_player() {
        let fixture = Fixture::new();
        fixture.load_tracks(3);
        assert_eq!(fixture.dispatch("p", &listener()), "Paused");
        assert_eq!(fixture.dispatch("p", &listener()), "Playing");
        assert_eq!(fixture.dispatch("n", &listener()), "track 2");
        assert_eq!(fixture.dispatch("c 3", &listener()), "track 3");
        assert_eq!(
            fixture.dispatch("gl", &listener()),
            "http://example.com/3.mp3"
        );
        assert_eq!(fixture.dispatch("v 80", &listener()), "Volume set to 80");
        assert_eq!(fixture.dispatch("v", &listener()), "Volume: 80");
        assert_eq!(fixture.dispatch("sf 10", &listener()), "Position: 10s");
        assert_eq!(fixture.dispatch("sb", &listener()), "Position: 5s");
        assert_eq!(fixture.dispatch("s", &listener()), "Stopped");
    }

    #[test]
    fn mode_command_reports_and_sets() {
        let fixture = Fixture::new();
        let reply = fixture.dispatch("m", &listener());
        assert!(reply.starts_with("Playback mode: track_list"));
        assert!(reply.contains("random"));
        assert_eq!(
            fixture.dispatch("m repeat_track", &listener()),
            "Playback mode: repeat_track"
        );
        assert_eq!(
            fixture.dispatch("m shuffle", &listener()),
            fixture.processor.help("m", &listener())
        );
    }

    #[test]
    fn quit_stops_the_loop_and_stays_silent() {
        let fixture = Fixture::new();
        assert_eq!(fixture.dispatch("q", &admin()), "");
        assert!(!fixture.running.load(Ordering::SeqCst));
        assert_eq!(
            fixture.dispatch("q", &listener()),
            format!(
                "Unknown command \"q\"\n{}",
                fixture.processor.help("", &listener())
            )
        );
    }

    #[test]
    fn the_easter_egg_answers_admins_only() {
        let fixture = Fixture::new();
        assert_eq!(fixture.dispatch("xyzzy", &admin()), "Nothing happens.");
        assert!(
            fixture
                .dispatch("xyzzy", &listener())
                .starts_with("Unknown command \"xyzzy\"")
        );
    }
}
