use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use player;
use services;
use tt;

use super::SessionLock;

pub struct CommandContext<'a, 'b, 'c, 'd, 'e> {
    pub player: &'a Mutex<player::Player>,
    pub service: &'b services::Resolver,
    pub tt: &'c tt::Client,
    pub lock: &'d SessionLock,
    pub running: &'e AtomicBool,
}
