mod links;
mod logging;
mod page;
mod surroundings;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use chrono::{Datelike, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{DefaultTerminal, Frame};
use teaser_background::{BackgroundOptions, ColorInputs, SpaceBackground};
use teaser_config::Config;

use crate::links::{SocialLink, social_links};
use crate::page::PageView;
use crate::surroundings::TerminalSurroundings;

/// How often the config file is checked for changes.
const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// How long a footer notice stays up.
const NOTICE_TTL: Duration = Duration::from_secs(3);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();
    let config = load_config();
    let terminal = ratatui::init();
    let result = App::new(config, Config::config_path()).run(terminal);
    ratatui::restore();
    result
}

/// Load the config file plus environment overrides, falling back to defaults.
fn load_config() -> Config {
    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "using default config");
        Config::default()
    });
    config.with_env()
}

/// Background settings from the config. Blank colors count as unset.
fn background_options(config: &Config) -> BackgroundOptions {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    BackgroundOptions {
        particle_count: config.background.particle_count,
        colors: ColorInputs {
            particle_color: non_empty(&config.background.particle_color),
            background_color: non_empty(&config.background.background_color),
        },
        pixel_ratio: config.background.pixel_ratio,
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Effective configuration, environment overrides included.
    config: Config,
    /// Where the config lives, if the platform has a config directory.
    config_path: Option<PathBuf>,
    config_modified: Option<SystemTime>,
    last_config_check: Instant,
    surroundings: TerminalSurroundings,
    background: SpaceBackground,
    links: Vec<SocialLink>,
    /// Footer message and when it was posted.
    notice: Option<(String, Instant)>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let surroundings = TerminalSurroundings::detect(config.page.background.clone(), config.scheme);
        Self {
            running: false,
            config_modified: config_path.as_deref().and_then(modified_time),
            config_path,
            last_config_check: Instant::now(),
            surroundings,
            background: SpaceBackground::new(background_options(&config)),
            links: social_links(&config.links),
            notice: None,
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        tracing::info!(
            particles = self.config.background.particle_count,
            scheme = self.config.scheme.label(),
            "starting"
        );
        while self.running {
            let frame_start = Instant::now();
            self.background.tick(frame_start, &self.surroundings);
            terminal.draw(|frame| self.render(frame))?;
            self.poll_config(frame_start);
            self.expire_notice(frame_start);
            self.handle_crossterm_events(frame_start + self.config.frame_interval())?;
        }
        tracing::info!("exiting");
        Ok(())
    }

    /// Renders the background, then the page on top of it.
    fn render(&mut self, frame: &mut Frame) {
        self.background.render(frame);
        let view = PageView {
            links: &self.links,
            status: &self.config.status,
            year: Local::now().year(),
            backdrop: self.background.backdrop(),
            scheme: self.config.scheme,
            notice: self.notice.as_ref().map(|(text, _)| text.as_str()),
        };
        page::render(frame, &view);
    }

    /// Reads crossterm events until `deadline`, the start of the next frame.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // The background never reacts to the mouse
                Event::Mouse(_) => {}
                // Picked up from the frame area on the next draw
                Event::Resize(_, _) => {}
                _ => {}
            }
            if Instant::now() >= deadline {
                break;
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.cycle_scheme(),
            (_, KeyCode::Char(c @ '1'..='4')) => self.activate_link(c as usize - '1' as usize),
            _ => {}
        }
    }

    /// Cycle the color scheme preference and remember it.
    fn cycle_scheme(&mut self) {
        self.config.scheme = self.config.scheme.next();
        self.surroundings.preference = self.config.scheme;
        self.background.scheme_changed();
        tracing::info!(scheme = self.config.scheme.label(), "scheme preference changed");
        self.set_notice(format!("Color scheme: {}", self.config.scheme.label()));
        self.persist_scheme();
    }

    /// Write the scheme to the config file without the environment overrides.
    fn persist_scheme(&mut self) {
        let Some(path) = self.config_path.clone() else {
            return;
        };
        let saved = Config::load_from(&path).and_then(|mut on_disk| {
            on_disk.scheme = self.config.scheme;
            on_disk.save_to(&path)
        });
        match saved {
            Ok(()) => self.config_modified = modified_time(&path),
            Err(err) => tracing::warn!(%err, "could not save scheme preference"),
        }
    }

    /// Open link `index` (zero-based) if it is enabled.
    fn activate_link(&mut self, index: usize) {
        let Some(link) = self.links.get(index) else {
            return;
        };
        let label = link.label;
        let Some(href) = link.href.clone() else {
            tracing::debug!(label, "ignoring disabled link");
            self.set_notice(format!("{label} is not available yet"));
            return;
        };
        match links::open_in_browser(&href) {
            Ok(()) => {
                tracing::info!(%href, "opened link");
                self.set_notice(format!("Opening {href}"));
            }
            Err(err) => {
                tracing::warn!(%href, %err, "could not open link");
                self.set_notice(format!("Could not open {href}"));
            }
        }
    }

    /// Reload the config file if it changed since the last check.
    fn poll_config(&mut self, now: Instant) {
        if now.duration_since(self.last_config_check) < CONFIG_POLL_INTERVAL {
            return;
        }
        self.last_config_check = now;
        let Some(path) = self.config_path.clone() else {
            return;
        };
        let modified = modified_time(&path);
        if modified == self.config_modified {
            return;
        }
        self.config_modified = modified;
        match Config::load_from(&path) {
            Ok(config) => self.apply_config(config.with_env(), now),
            Err(err) => tracing::warn!(%err, "ignoring invalid config"),
        }
    }

    /// Take over a reloaded config. Counts as a style change on the page.
    fn apply_config(&mut self, config: Config, now: Instant) {
        tracing::info!("config reloaded");
        let scheme_changed = config.scheme != self.config.scheme;
        self.background.reconfigure(background_options(&config));
        self.surroundings.page_background = config.page.background.clone();
        self.surroundings.preference = config.scheme;
        self.links = social_links(&config.links);
        self.config = config;
        if scheme_changed {
            self.background.scheme_changed();
        }
        self.background.style_mutated(now);
    }

    fn set_notice(&mut self, text: String) {
        self.notice = Some((text, Instant::now()));
    }

    fn expire_notice(&mut self, now: Instant) {
        if let Some((_, posted)) = &self.notice
            && now.duration_since(*posted) >= NOTICE_TTL
        {
            self.notice = None;
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use teaser_core::SchemePreference;

    use super::*;

    fn app() -> App {
        let mut app = App::new(Config::default(), None);
        app.running = true;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            press(&mut app, code);
            assert!(!app.running);
        }
        let mut app = app();
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_scheme_key_cycles_preference() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.config.scheme, SchemePreference::Light);
        assert_eq!(app.surroundings.preference, SchemePreference::Light);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.config.scheme, SchemePreference::Dark);
        assert!(app.notice.as_ref().is_some_and(|(text, _)| text.ends_with("dark")));
    }

    #[test]
    fn test_disabled_link_only_posts_notice() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        let (text, _) = app.notice.clone().unwrap();
        assert_eq!(text, "Follow on X is not available yet");
        assert!(app.running);
    }

    #[test]
    fn test_notice_expires() {
        let mut app = app();
        app.set_notice("hello".to_string());
        let posted = app.notice.as_ref().map(|(_, at)| *at).unwrap();
        app.expire_notice(posted + Duration::from_secs(1));
        assert!(app.notice.is_some());
        app.expire_notice(posted + NOTICE_TTL);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_background_options_treat_blank_as_unset() {
        let mut config = Config::default();
        config.background.particle_color = Some("  ".to_string());
        config.background.background_color = Some(" #000 ".to_string());
        config.background.particle_count = 12;
        let options = background_options(&config);
        assert_eq!(options.particle_count, 12);
        assert_eq!(options.colors.particle_color, None);
        assert_eq!(options.colors.background_color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_apply_config_updates_links_and_background() {
        let mut app = app();
        let mut config = Config::default();
        config.links.x = "https://x.com/memebattles".to_string();
        config.background.particle_count = 7;
        config.scheme = SchemePreference::Dark;
        app.apply_config(config, Instant::now());

        assert!(!app.links[0].is_disabled());
        assert_eq!(app.background.options().particle_count, 7);
        assert_eq!(app.surroundings.preference, SchemePreference::Dark);
        assert!(app.background.is_settling());
    }

    #[test]
    fn test_scheme_save_and_config_reload() {
        let dir = std::env::temp_dir().join(format!("teaser-app-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        Config::default().save_to(&path).unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.links.x = "https://x.com/from-env".to_string();
        let mut app = App::new(config, Some(path.clone()));
        app.running = true;

        // Only the scheme reaches the file, never environment overrides
        press(&mut app, KeyCode::Char('s'));
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(!on_disk.contains("from-env"));
        let saved = Config::from_toml(&on_disk).unwrap();
        assert_eq!(saved.scheme, SchemePreference::Light);
        assert_eq!(saved.links.x, "https://x.com/");

        let mut edited = saved;
        edited.background.particle_count = 9;
        edited.save_to(&path).unwrap();
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();

        let now = Instant::now();
        app.poll_config(now + CONFIG_POLL_INTERVAL);
        assert_eq!(app.background.options().particle_count, 9);
        assert!(app.background.is_settling());
        assert_eq!(app.config.scheme, SchemePreference::Light);

        // Unchanged file is not reloaded again
        app.background.tick(now + CONFIG_POLL_INTERVAL * 2, &app.surroundings);
        assert!(!app.background.is_settling());
        app.poll_config(now + CONFIG_POLL_INTERVAL * 2);
        assert!(!app.background.is_settling());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_draws_page_over_background() {
        let mut app = app();
        app.background.tick(Instant::now(), &app.surroundings);
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        assert_eq!(app.background.field().map(|f| f.revealed()), Some(1));
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("coming soon"));
    }
}
