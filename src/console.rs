use std::cell::Cell;
use std::io::{self, Write};

use config;
use tt::{ChannelId, Client, Error, Message, User};

const CONSOLE_CHANNEL: ChannelId = 1;

/// A local stand-in for a real voice-chat connection: one operator
/// typing on stdin, classified against the configured admin and ban
/// lists, with replies printed back to the terminal.
pub struct Console {
    username: String,
    is_admin: bool,
    is_banned: bool,
    voice_active: Cell<bool>,
}

impl Console {
    pub fn new(username: String, users: &config::UsersConfig) -> Console {
        Console {
            is_admin: users.admins.iter().any(|name| name == &username),
            is_banned: users.banned.iter().any(|name| name == &username),
            username: username,
            voice_active: Cell::new(false),
        }
    }
}

impl Client for Console {
    fn my_channel_id(&self) -> ChannelId {
        CONSOLE_CHANNEL
    }

    fn next_message(&self) -> Result<Option<Message>, Error> {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }

        Ok(Some(Message {
            text: line,
            user: User {
                username: self.username.clone(),
                is_admin: self.is_admin,
                is_banned: self.is_banned,
                channel_id: CONSOLE_CHANNEL,
            },
        }))
    }

    fn reply(&self, _to: &Message, text: &str) -> Result<(), Error> {
        println!("{}", text);
        Ok(())
    }

    fn change_nickname(&self, nickname: &str) -> Result<(), Error> {
        info!("nickname changed to {}", nickname);
        Ok(())
    }

    fn change_status(&self, status: &str) -> Result<(), Error> {
        info!("status changed to {:?}", status);
        Ok(())
    }

    fn toggle_voice_transmission(&self) -> Result<bool, Error> {
        let active = !self.voice_active.get();
        self.voice_active.set(active);
        info!(
            "voice transmission {}",
            if active { "enabled" } else { "disabled" }
        );
        Ok(active)
    }
}
