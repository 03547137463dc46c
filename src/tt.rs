use std::io;

pub type ChannelId = i32;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            from()
            display("Transport error")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub channel_id: ChannelId,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub user: User,
}

pub trait Client {
    fn my_channel_id(&self) -> ChannelId;

    /// Blocks until the next text message arrives. `None` means the
    /// transport is gone and the bot should shut down.
    fn next_message(&self) -> Result<Option<Message>, Error>;

    fn reply(&self, to: &Message, text: &str) -> Result<(), Error>;

    fn change_nickname(&self, nickname: &str) -> Result<(), Error>;

    fn change_status(&self, status: &str) -> Result<(), Error>;

    fn toggle_voice_transmission(&self) -> Result<bool, Error>;
}
