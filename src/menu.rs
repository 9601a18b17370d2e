use std::io::{BufRead, Write};

use crate::error::MenuError;
use crate::launcher::Launcher;
use crate::settings::{LayerSetting, SettingsFile};

const BANNER: &str = "==============================\n            LSVM\n==============================";
const OPTIONS: &str = "1. Start\n2. Settings\n3. End";
const MENU_PROMPT: &str = "Select an option: ";
const INVALID_CHOICE: &str = "Invalid choice. Please enter 1, 2 or 3.";
const EXPONENT_PROMPT: &str = "Enter the exponent (number of layers): ";
const SETTINGS_BANNER: &str = "========== Settings ==========";
const SETTINGS_NOTICE: &str = "Settings are not implemented yet.";
const PAUSE_PROMPT: &str = "Press Enter to continue . . . ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Start,
    Settings,
    End,
}

impl MenuChoice {
    /// Exact match on "1", "2" or "3"; anything else is invalid.
    pub fn parse(input: &[u8]) -> Option<Self> {
        match input {
            b"1" => Some(MenuChoice::Start),
            b"2" => Some(MenuChoice::Settings),
            b"3" => Some(MenuChoice::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MainMenu,
    RunSetup,
    SettingsStub,
    Terminated,
}

/// Strips one `\n` and one `\r` before it. Other whitespace is part of the value.
/// Works on raw bytes, so input that is not UTF-8 is still a line.
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub struct Controller<R, W, L> {
    input: R,
    out: W,
    launcher: L,
    settings: SettingsFile,
    pause: bool,
}

impl<R: BufRead, W: Write, L: Launcher> Controller<R, W, L> {
    pub fn new(input: R, out: W, launcher: L, settings: SettingsFile, pause: bool) -> Self {
        Self {
            input,
            out,
            launcher,
            settings,
            pause,
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (W, L) {
        (self.out, self.launcher)
    }

    /// Drives the menu until it reaches `State::Terminated`.
    pub fn run(&mut self) -> Result<(), MenuError> {
        let mut state = State::MainMenu;
        while state != State::Terminated {
            let next = self.step(state)?;
            log::debug!("{:?} -> {:?}", state, next);
            state = next;
        }
        Ok(())
    }

    pub fn step(&mut self, state: State) -> Result<State, MenuError> {
        let next = match state {
            State::MainMenu => match self.show_main_menu()? {
                MenuChoice::Start => State::RunSetup,
                MenuChoice::Settings => State::SettingsStub,
                MenuChoice::End => State::Terminated,
            },
            State::RunSetup => {
                self.run_setup()?;
                State::Terminated
            }
            State::SettingsStub => {
                self.settings_stub()?;
                State::MainMenu
            }
            State::Terminated => State::Terminated,
        };
        Ok(next)
    }

    /// Shows the menu and asks again until a valid choice comes in.
    pub fn show_main_menu(&mut self) -> Result<MenuChoice, MenuError> {
        loop {
            writeln!(self.out, "{BANNER}")?;
            writeln!(self.out, "{OPTIONS}")?;
            let line = self.prompt(MENU_PROMPT)?.ok_or(MenuError::InputClosed)?;

            if let Some(choice) = MenuChoice::parse(&line) {
                return Ok(choice);
            }
            log::debug!("rejected menu input {:?}", String::from_utf8_lossy(&line));
            writeln!(self.out, "{INVALID_CHOICE}")?;
        }
    }

    /// Stores the exponent, then hands over to the renderer and waits for it.
    ///
    /// Only a failed settings write is fatal. Activation and launch problems are
    /// printed and the flow carries on to the pause, like the batch menu did.
    pub fn run_setup(&mut self) -> Result<(), MenuError> {
        let raw = self
            .prompt(EXPONENT_PROMPT)?
            .ok_or(MenuError::InputClosed)?;
        let setting = LayerSetting::new(raw);

        self.settings.store(&setting)?;
        writeln!(
            self.out,
            "Saved exponent {} to {}",
            setting.display(),
            self.settings.path().display()
        )?;
        self.out.flush()?;

        if let Err(e) = self.launcher.activate() {
            log::warn!("activation failed: {e}");
            writeln!(self.out, "Could not activate environment: {e}")?;
        }

        match self.launcher.run() {
            Ok(completion) if completion.success() => {}
            Ok(completion) => match completion.code {
                Some(code) => writeln!(self.out, "Program exited with code {code}")?,
                None => writeln!(self.out, "Program was terminated")?,
            },
            Err(e) => {
                log::warn!("launch failed: {e}");
                writeln!(self.out, "Could not start {e}")?;
            }
        }

        if self.pause {
            // EOF counts as the keypress.
            self.prompt(PAUSE_PROMPT)?;
        }
        Ok(())
    }

    pub fn settings_stub(&mut self) -> Result<(), MenuError> {
        writeln!(self.out, "{SETTINGS_BANNER}")?;
        writeln!(self.out, "{SETTINGS_NOTICE}")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<Vec<u8>>, MenuError> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line_ending(&line).to_vec()))
    }
}
