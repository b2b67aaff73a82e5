//! Presentation collaborator
//!
//! The session reports what the player should see through `Presenter`; it
//! never touches the DOM itself.

/// View updates driven by the session
pub trait Presenter {
    /// Live score while running
    fn show_score(&mut self, score: u64);
    /// End-of-round overlay with the final score and leaderboard rank
    fn show_game_over(&mut self, score: u64, rank: Option<usize>);
    fn hide_game_over(&mut self);
    /// Redraw the leaderboard list
    fn show_leaderboard(&mut self, scores: &[u64]);
    /// Show/hide the leaderboard panel
    fn toggle_leaderboard(&mut self);
    /// Start/restart control and leaderboard button visibility
    fn set_start_visible(&mut self, visible: bool, restart: bool);
}

/// Presenter that only logs (headless native runs)
#[derive(Debug, Default)]
pub struct LogPresenter {
    leaderboard_open: bool,
}

impl Presenter for LogPresenter {
    fn show_score(&mut self, score: u64) {
        log::trace!("Score: {}", score);
    }

    fn show_game_over(&mut self, score: u64, rank: Option<usize>) {
        match rank {
            Some(rank) => log::info!("Game over: {} (rank #{})", score, rank),
            None => log::info!("Game over: {}", score),
        }
    }

    fn hide_game_over(&mut self) {}

    fn show_leaderboard(&mut self, scores: &[u64]) {
        for (i, score) in scores.iter().enumerate() {
            log::info!("{:>2}. {}", i + 1, score);
        }
    }

    fn toggle_leaderboard(&mut self) {
        self.leaderboard_open = !self.leaderboard_open;
    }

    fn set_start_visible(&mut self, _visible: bool, _restart: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;

#[cfg(target_arch = "wasm32")]
mod dom {
    use super::Presenter;
    use web_sys::{Document, Element};

    /// Presenter backed by the page's DOM elements
    pub struct DomPresenter {
        document: Document,
    }

    impl DomPresenter {
        pub fn new(document: Document) -> Self {
            Self { document }
        }

        fn el(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.el(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }
    }

    impl Presenter for DomPresenter {
        fn show_score(&mut self, score: u64) {
            if let Some(el) = self.el("score") {
                el.set_text_content(Some(&score.to_string()));
            }
        }

        fn show_game_over(&mut self, score: u64, rank: Option<usize>) {
            if let Some(el) = self.el("finalScore") {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = self.el("finalRank") {
                let text = rank.map(|r| format!("#{}", r)).unwrap_or_default();
                el.set_text_content(Some(&text));
            }
            self.set_hidden("gameOverPopup", false);
        }

        fn hide_game_over(&mut self) {
            self.set_hidden("gameOverPopup", true);
        }

        fn show_leaderboard(&mut self, scores: &[u64]) {
            let Some(list) = self.el("leaderboardList") else {
                return;
            };
            list.set_inner_html("");
            for score in scores {
                if let Ok(li) = self.document.create_element("li") {
                    li.set_text_content(Some(&score.to_string()));
                    let _ = list.append_child(&li);
                }
            }
        }

        fn toggle_leaderboard(&mut self) {
            if let Some(el) = self.el("leaderboard") {
                let _ = el.class_list().toggle("hidden");
            }
        }

        fn set_start_visible(&mut self, visible: bool, restart: bool) {
            self.set_hidden("startButton", !visible);
            self.set_hidden("leaderboardButton", !visible);
            if restart {
                if let Some(el) = self.el("startButton") {
                    el.set_text_content(Some("Restart"));
                }
            }
        }
    }
}
