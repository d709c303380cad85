//! Terminal piano and note-reading quiz
//!
//! Plays preloaded piano samples through the background sound worker.
//! Keys are typed on stdin, one command per line:
//!
//! - `39`, `C`, `c#`, `G Sharp@0.4` - play a key, optionally at a volume
//! - `quiz` - show the note to name
//! - `next` - move the quiz to a new random note
//! - `guess <key>` - answer the quiz
//! - `unload <key>` - release a key's sample
//! - `quit` - stop the worker and exit
//!
//! Usage: `piano_app [--dry-run] [config.toml|config.ron]`

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use piano_audio::audio::{
    AudioError, RecordingSoundPool, RodioSoundPool, SoundId, SoundItem, SoundThread,
};
use piano_audio::config::{AudioConfig, Config, ConfigError};
use piano_audio::foundation::logging;
use piano_audio::piano::{GuessOutcome, Keyboard, Note, NoteParseError, NoteQuiz};
use rand::rngs::ThreadRng;
use rodio::OutputStream;

const DEFAULT_VOLUME: f32 = 0.8;

/// Application errors
#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("audio: {0}")]
    Audio(#[from] AudioError),

    #[error("{0}")]
    Note(#[from] NoteParseError),

    #[error("invalid volume {0:?}")]
    Volume(String),

    #[error("no sample loaded for {0}")]
    Unbound(Note),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Command line options
#[derive(Debug, Default)]
struct Options {
    dry_run: bool,
    config_path: Option<String>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut options = Self::default();
        for arg in args {
            if arg == "--dry-run" {
                options.dry_run = true;
            } else {
                options.config_path = Some(arg);
            }
        }
        options
    }
}

/// What the input loop should do after a line
enum Flow {
    Continue,
    Quit,
}

/// Interactive state for one run
struct Session {
    worker: SoundThread,
    keyboard: Keyboard,
    quiz: NoteQuiz,
    rng: ThreadRng,
}

impl Session {
    fn new(worker: SoundThread, keyboard: Keyboard) -> Self {
        let mut rng = rand::thread_rng();
        let mut quiz = NoteQuiz::default();
        quiz.next_random(&mut rng);

        Self {
            worker,
            keyboard,
            quiz,
            rng,
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, AppError> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "quit" | "q" => return Ok(Flow::Quit),
            "quiz" => self.show_quiz(),
            "next" => {
                self.quiz.next_random(&mut self.rng);
                self.show_quiz();
            }
            "guess" => self.guess(rest.parse()?)?,
            "unload" => {
                let note: Note = rest.parse()?;
                let sound_id = self.keyboard.unbind(note).ok_or(AppError::Unbound(note))?;
                self.worker.unload_sound(sound_id);
                println!("Unloaded {note}");
            }
            _ => self.play(line)?,
        }

        Ok(Flow::Continue)
    }

    fn show_quiz(&self) {
        let note = self.quiz.note();
        let clef = if note.is_in_bass() { "bass" } else { "treble" };
        println!("Name the note on key {} ({clef} clef)", note.index());
    }

    fn play(&self, input: &str) -> Result<(), AppError> {
        let (key, volume) = match input.split_once('@') {
            Some((key, volume)) => {
                let volume = volume
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| AppError::Volume(volume.to_string()))?;
                (key, volume)
            }
            None => (input, DEFAULT_VOLUME),
        };

        let note: Note = key.parse()?;
        self.press(note, volume)
    }

    fn press(&self, note: Note, volume: f32) -> Result<(), AppError> {
        let item = self
            .keyboard
            .press(note, volume)
            .ok_or(AppError::Unbound(note))?;
        self.worker.enqueue(item)?;
        Ok(())
    }

    fn guess(&mut self, pressed: Note) -> Result<(), AppError> {
        if let Err(e) = self.press(pressed, DEFAULT_VOLUME) {
            log::debug!("Guess not played: {e}");
        }

        match self.quiz.guess(pressed) {
            GuessOutcome::Correct => {
                println!("Correct! Now find it in the other clef, or type `next` for a new note.");
            }
            GuessOutcome::Wrong { expected } => {
                println!(
                    "No, key {} was {}; you pressed {}",
                    expected.index(),
                    expected.name(),
                    pressed.name()
                );
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<(), AppError> {
        match self.worker.enqueue(SoundItem::stop()) {
            Ok(()) | Err(AudioError::WorkerStopped) => {}
            Err(e) => return Err(e.into()),
        }

        let exit = self.worker.join()?;
        log::info!(
            "Sound worker ended: {:?} ({} played, {} failed, {} discarded)",
            exit.reason,
            exit.played,
            exit.failed,
            exit.discarded
        );
        Ok(())
    }
}

/// Load every sample in the quiz range that exists on disk
fn load_samples(pool: &RodioSoundPool, config: &AudioConfig) -> Keyboard {
    let mut keyboard = Keyboard::new();

    if !config.samples.directory_exists() {
        log::warn!("Sample directory {} not found", config.samples.directory.display());
        return keyboard;
    }

    for index in Note::LOWEST.index()..=Note::HIGHEST.index() {
        let note = Note::new(index);
        let path = config.samples.path_for(note);
        match pool.load_file(&path) {
            Ok(sound_id) => {
                keyboard.bind(note, sound_id);
            }
            Err(e) => log::warn!("Skipping {}: {e}", path.display()),
        }
    }

    log::info!("Loaded {} piano samples", keyboard.len());
    keyboard
}

/// Bind every key to a fake sound id for a recording pool
fn dry_run_keyboard() -> Keyboard {
    let mut keyboard = Keyboard::new();
    for index in Note::LOWEST.index()..=Note::HIGHEST.index() {
        if let Ok(id) = u32::try_from(index) {
            keyboard.bind(Note::new(index), SoundId(id));
        }
    }
    keyboard
}

fn run_session(mut session: Session) -> Result<(), AppError> {
    let stdin = io::stdin();

    print!("> ");
    io::stdout().flush()?;

    for line in stdin.lock().lines() {
        match session.handle_line(&line?) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{e}"),
        }
        print!("> ");
        io::stdout().flush()?;
    }

    session.finish()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(logging::LevelFilter::Info);

    let options = Options::parse(std::env::args().skip(1));
    let config = match &options.config_path {
        Some(path) => AudioConfig::load_from_file(path)?,
        None => AudioConfig::default(),
    };

    log::info!("Starting piano (dry run: {})", options.dry_run);

    if options.dry_run {
        let pool = Arc::new(RecordingSoundPool::new());
        let mut worker = SoundThread::new(pool.clone(), &config.worker);
        worker.start()?;

        run_session(Session::new(worker, dry_run_keyboard()))?;
        log::info!("Recorded {} play calls", pool.plays().len());
        return Ok(());
    }

    // The output stream must stay alive on this thread for the whole session
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {e}")))?;
    let pool = Arc::new(RodioSoundPool::new(stream_handle, config.pool.clone()));
    let keyboard = load_samples(&pool, &config);

    let mut worker = SoundThread::new(pool.clone(), &config.worker);
    worker.start()?;

    run_session(Session::new(worker, keyboard))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dry_session() -> (Arc<RecordingSoundPool>, Session) {
        let pool = Arc::new(RecordingSoundPool::new());
        let mut worker = SoundThread::with_defaults(pool.clone());
        worker.start().unwrap();
        (pool, Session::new(worker, dry_run_keyboard()))
    }

    #[test]
    fn test_options() {
        let options = Options::parse(["--dry-run", "piano.toml"].iter().map(|s| s.to_string()));
        assert!(options.dry_run);
        assert_eq!(options.config_path.as_deref(), Some("piano.toml"));
    }

    #[test]
    fn test_play_lines() {
        let (pool, mut session) = dry_session();
        session.handle_line("39").unwrap();
        session.handle_line("C#@0.5").unwrap();
        assert!(matches!(session.handle_line("quit"), Ok(Flow::Quit)));
        session.finish().unwrap();

        let plays = pool.plays();
        assert_eq!(plays.len(), 2);
        assert_eq!(plays[0].sound_id, SoundId(39));
        assert_eq!(plays[1].sound_id, SoundId(40));
        assert_relative_eq!(plays[1].left, 0.5);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let (pool, mut session) = dry_session();
        assert!(matches!(session.handle_line("H"), Err(AppError::Note(_))));
        assert!(matches!(session.handle_line("C@loud"), Err(AppError::Volume(_))));
        assert!(matches!(
            session.handle_line("C@2.0"),
            Err(AppError::Audio(AudioError::InvalidVolume(_)))
        ));
        assert!(matches!(session.handle_line("80"), Err(AppError::Unbound(_))));
        session.finish().unwrap();
        assert!(pool.plays().is_empty());
    }

    #[test]
    fn test_correct_guess_moves_to_other_clef() {
        let (pool, mut session) = dry_session();
        let shown = session.quiz.note();

        session.handle_line(&format!("guess {}", shown.index())).unwrap();
        let now = session.quiz.note();
        assert!(now.same_pitch_class(shown));
        assert_ne!(now.is_in_bass(), shown.is_in_bass());

        session.finish().unwrap();
        assert_eq!(pool.plays().len(), 1);
    }

    #[test]
    fn test_next_picks_new_pitch_class() {
        let (_pool, mut session) = dry_session();
        let shown = session.quiz.note();
        session.handle_line("next").unwrap();
        assert!(!session.quiz.note().same_pitch_class(shown));
        session.finish().unwrap();
    }

    #[test]
    fn test_unload() {
        let (pool, mut session) = dry_session();
        session.handle_line("unload 39").unwrap();
        assert!(matches!(session.handle_line("39"), Err(AppError::Unbound(_))));
        session.finish().unwrap();
        assert_eq!(pool.unloads(), vec![SoundId(39)]);
    }
}
