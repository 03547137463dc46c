extern crate rand;

use self::rand::Rng;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        NothingIsPlaying {
            display("Nothing is playing")
        }
        EmptyTrackList {
            display("Track list is empty")
        }
        InvalidTrackNumber(number: usize) {
            display("No track number {}", number)
        }
        VolumeOutOfRange(value: u32) {
            display("Volume must be between 0 and 100")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SingleTrack,
    RepeatTrack,
    TrackList,
    RepeatTrackList,
    Random,
}

pub const MODES: &'static [Mode] = &[
    Mode::SingleTrack,
    Mode::RepeatTrack,
    Mode::TrackList,
    Mode::RepeatTrackList,
    Mode::Random,
];

impl Mode {
    pub fn from_name(name: &str) -> Option<Mode> {
        match name {
            "single_track" => Some(Mode::SingleTrack),
            "repeat_track" => Some(Mode::RepeatTrack),
            "track_list" => Some(Mode::TrackList),
            "repeat_track_list" => Some(Mode::RepeatTrackList),
            "random" => Some(Mode::Random),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Mode::SingleTrack => "single_track",
            Mode::RepeatTrack => "repeat_track",
            Mode::TrackList => "track_list",
            Mode::RepeatTrackList => "repeat_track_list",
            Mode::Random => "random",
        }
    }
}

/// Logical playback state shared by all command handlers. Decoding and
/// audio output live behind the transport's voice connection, not here.
pub struct Player {
    status: Status,
    volume: u8,
    seek_step: f64,
    mode: Mode,
    track_list: Vec<Track>,
    track_index: usize,
    position: f64,
}

impl Player {
    pub fn new(default_volume: u8, seek_step: f64) -> Player {
        Player {
            status: Status::Stopped,
            volume: default_volume,
            seek_step: seek_step,
            mode: Mode::TrackList,
            track_list: Vec::new(),
            track_index: 0,
            position: 0.0,
        }
    }

    pub fn play(&mut self, tracks: Vec<Track>) -> Result<Track, Error> {
        if tracks.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        self.track_list = tracks;
        self.track_index = 0;
        self.position = 0.0;
        self.status = Status::Playing;
        Ok(self.track_list[0].clone())
    }

    pub fn play_pause(&mut self) -> Result<Status, Error> {
        self.status = match self.status {
            Status::Playing => Status::Paused,
            Status::Paused => Status::Playing,
            Status::Stopped => {
                if self.track_list.is_empty() {
                    return Err(Error::NothingIsPlaying);
                }
                Status::Playing
            }
        };
        Ok(self.status)
    }

    pub fn stop(&mut self) {
        self.status = Status::Stopped;
        self.track_list.clear();
        self.track_index = 0;
        self.position = 0.0;
    }

    pub fn previous(&mut self) -> Result<Track, Error> {
        if self.track_list.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        self.track_index = match self.mode {
            Mode::Random => rand::thread_rng().gen_range(0, self.track_list.len()),
            _ => {
                if self.track_index == 0 {
                    self.track_list.len() - 1
                } else {
                    self.track_index - 1
                }
            }
        };
        self.position = 0.0;
        self.status = Status::Playing;
        Ok(self.track_list[self.track_index].clone())
    }

    pub fn next(&mut self) -> Result<Track, Error> {
        if self.track_list.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        self.track_index = match self.mode {
            Mode::Random => rand::thread_rng().gen_range(0, self.track_list.len()),
            _ => (self.track_index + 1) % self.track_list.len(),
        };
        self.position = 0.0;
        self.status = Status::Playing;
        Ok(self.track_list[self.track_index].clone())
    }

    /// Track numbers are 1-based, matching what the track list shows users.
    pub fn select_track(&mut self, number: usize) -> Result<Track, Error> {
        if self.track_list.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        if number < 1 || number > self.track_list.len() {
            return Err(Error::InvalidTrackNumber(number));
        }
        self.track_index = number - 1;
        self.position = 0.0;
        self.status = Status::Playing;
        Ok(self.track_list[self.track_index].clone())
    }

    pub fn seek_back(&mut self, seconds: Option<f64>) -> Result<f64, Error> {
        if self.status == Status::Stopped {
            return Err(Error::NothingIsPlaying);
        }
        let step = seconds.unwrap_or(self.seek_step);
        self.position = (self.position - step).max(0.0);
        Ok(self.position)
    }

    pub fn seek_forward(&mut self, seconds: Option<f64>) -> Result<f64, Error> {
        if self.status == Status::Stopped {
            return Err(Error::NothingIsPlaying);
        }
        let step = seconds.unwrap_or(self.seek_step);
        self.position = self.position + step;
        Ok(self.position)
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn set_volume(&mut self, value: u32) -> Result<u8, Error> {
        if value > 100 {
            return Err(Error::VolumeOutOfRange(value));
        }
        self.volume = value as u8;
        Ok(self.volume)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_track(&self) -> Result<Track, Error> {
        if self.status == Status::Stopped {
            return Err(Error::NothingIsPlaying);
        }
        self.track_list
            .get(self.track_index)
            .cloned()
            .ok_or(Error::NothingIsPlaying)
    }
}
