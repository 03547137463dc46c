use std;

use player;
use services;
use tt;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Player(err: player::Error) {
            from()
            display("{}", err)
        }
        Service(err: services::Error) {
            from()
            display("{}", err)
        }
        Tt(err: tt::Error) {
            from()
            display("{}", err)
        }
        InvalidArgument {
            from(std::num::ParseIntError)
            from(std::num::ParseFloatError)
            display("Invalid argument")
        }
        MissingArgument(arg: &'static str) {
            display("Missing argument: {}", arg)
        }
        PoisonError {
            display("Internal state poisoned")
        }
    }
}

impl<T> std::convert::From<std::sync::PoisonError<T>> for Error {
    fn from(_err: std::sync::PoisonError<T>) -> Self {
        Error::PoisonError
    }
}

/// What the dispatcher should do with a handler failure: recover with the
/// command's help line, or surface it as an error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    InvalidArgument,
    Unavailable,
    Internal,
}

impl Error {
    pub fn kind(&self) -> Kind {
        match *self {
            Error::InvalidArgument | Error::MissingArgument(_) => Kind::InvalidArgument,
            Error::Player(ref err) => match *err {
                player::Error::InvalidTrackNumber(_) |
                player::Error::VolumeOutOfRange(_) => Kind::InvalidArgument,
                player::Error::NothingIsPlaying |
                player::Error::EmptyTrackList => Kind::Unavailable,
            },
            Error::Service(ref err) => match *err {
                services::Error::MissingConfig(_) |
                services::Error::NoResults(_) => Kind::Unavailable,
                services::Error::Request(_) |
                services::Error::UnexpectedStatus(_) => Kind::Internal,
            },
            Error::Tt(_) | Error::PoisonError => Kind::Internal,
        }
    }
}
