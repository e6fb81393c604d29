//! 進捗表示（スピナー）
//!
//! ポーリング中の状態ラベルを stderr の1行に表示する。
//! 表示は補助的なものなので、書き込みエラーはすべて無視する。

use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{IsTerminal, Stderr, Write};

const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// 進捗表示の共通インターフェース
pub trait Progress: Send {
    /// ラベルを表示（既に表示中なら差し替え）
    fn start(&mut self, label: &str);

    /// 表示を終了。ラベル指定時は最終状態として残す
    fn stop(&mut self, label: Option<&str>);
}

/// 何も表示しない
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _label: &str) {}

    fn stop(&mut self, _label: Option<&str>) {}
}

/// stderr に1行で描画するスピナー
pub struct TerminalSpinner {
    out: Stderr,
    frame: usize,
    active: bool,
}

impl TerminalSpinner {
    pub fn new() -> Self {
        Self {
            out: std::io::stderr(),
            frame: 0,
            active: false,
        }
    }

    fn clear_line(&mut self) {
        let _ = execute!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine));
    }
}

impl Default for TerminalSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for TerminalSpinner {
    fn start(&mut self, label: &str) {
        let frame = FRAMES[self.frame % FRAMES.len()];
        self.frame = self.frame.wrapping_add(1);
        self.active = true;
        let _ = execute!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("{} {}", frame, label))
        );
    }

    fn stop(&mut self, label: Option<&str>) {
        if self.active {
            self.active = false;
            self.clear_line();
        }
        if let Some(label) = label {
            let _ = writeln!(self.out, "{}", label);
        }
        let _ = self.out.flush();
    }
}

impl Drop for TerminalSpinner {
    fn drop(&mut self) {
        self.stop(None);
    }
}

/// 端末なら TerminalSpinner、それ以外（パイプ・CI）は NoProgress
pub fn for_stderr() -> Box<dyn Progress> {
    if std::io::stderr().is_terminal() {
        Box::new(TerminalSpinner::new())
    } else {
        Box::new(NoProgress)
    }
}
