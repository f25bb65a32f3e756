//! Round state machine
//!
//! `GameState` is the single writer of session state: the cards built from
//! the catalog, the current round, the player's selection, the retry counter,
//! score, phase and feedback message. Every operation is total; clicks that
//! hit nothing, repeated toggles or out-of-order calls either complete a
//! transition or leave the state unchanged.

use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::card::{Card, ClassCard, InterfaceCard};
use super::layout::{self, Viewport};
use crate::catalog::Catalog;
use crate::consts::*;
use crate::points_for_retries;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first class is picked (plays exactly like `Play`)
    Tutorial,
    /// Rounds in progress
    Play,
    /// All rounds answered; any click restarts
    Complete,
}

/// The latest feedback line and how long it stays up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub text: String,
    /// Seconds left on screen; hidden at <= 0
    pub timer: f32,
}

impl Feedback {
    pub fn is_visible(&self) -> bool {
        self.timer > 0.0
    }

    pub(crate) fn countdown(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer -= dt;
        }
    }
}

/// Notable transitions, queued for the host (sound cues, analytics)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ClassSelected { class: usize },
    /// A second interface was clicked while one was already selected
    InterfaceRejected { interface: usize },
    WrongGuess { round: usize, retries: u8 },
    RoundCleared { round: usize, points: u32 },
    Completed { score: u32 },
    SelectionCleared,
    Restarted,
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClickTarget {
    Interface(usize),
    Class(usize),
    Empty,
    /// The session was complete, so the click restarted it
    Restart,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Catalog,
    pub(crate) classes: Vec<ClassCard>,
    pub(crate) interfaces: Vec<InterfaceCard>,
    /// Current round index (0-based, equals round count once complete)
    pub(crate) round: usize,
    /// Class card picked this round, required before choosing an interface
    pub(crate) selected_card: Option<usize>,
    pub(crate) score: u32,
    /// Wrong guesses this round, saturating at `MAX_RETRIES`
    pub(crate) retry_count: u8,
    pub(crate) phase: GamePhase,
    pub(crate) feedback: Feedback,
    pub(crate) viewport: Viewport,
    pub(crate) content_height: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build every card from the catalog and enter round 0
    pub fn new(catalog: Catalog, viewport: Viewport) -> Self {
        let classes = catalog
            .rounds()
            .iter()
            .enumerate()
            .map(|(i, r)| ClassCard::new(i, &r.class))
            .collect();
        let interfaces = catalog
            .rounds()
            .iter()
            .flat_map(|r| r.interfaces.iter())
            .enumerate()
            .map(|(i, def)| InterfaceCard::new(i, def))
            .collect();

        let viewport = viewport.sanitized();
        let mut state = Self {
            catalog,
            classes,
            interfaces,
            round: 0,
            selected_card: None,
            score: 0,
            retry_count: 0,
            phase: GamePhase::Tutorial,
            feedback: Feedback {
                text: String::new(),
                timer: 0.0,
            },
            viewport,
            content_height: viewport.height,
            events: Vec::new(),
        };
        state.enter_round();
        state.show_message("Welcome to C# Class Builder! Click on the class card to start.");
        state
    }

    // === Accessors ===

    pub fn classes(&self) -> &[ClassCard] {
        &self.classes
    }

    pub fn interfaces(&self) -> &[InterfaceCard] {
        &self.interfaces
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn round_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn selected_card(&self) -> Option<usize> {
        self.selected_card
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Interface card indices of the current round's triple
    pub fn active_triple(&self) -> Range<usize> {
        let start = self.round * TRIPLE_SIZE;
        start..start + TRIPLE_SIZE
    }

    /// Index of the correct interface card this round (None once complete)
    pub fn correct_interface(&self) -> Option<usize> {
        self.catalog
            .rounds()
            .get(self.round)
            .map(|r| self.round * TRIPLE_SIZE + r.correct)
    }

    /// Indices of every selected interface card
    pub fn selected_interfaces(&self) -> Vec<usize> {
        self.interfaces
            .iter()
            .filter(|c| c.is_selected())
            .map(|c| c.id)
            .collect()
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Layout ===

    /// Adopt a new viewport and re-place the current round's cards.
    /// Returns the content height the host should size its surface to.
    pub fn set_viewport(&mut self, viewport: Viewport) -> f32 {
        self.viewport = viewport.sanitized();
        self.relayout()
    }

    /// Push layout positions into the current round's cards. Only positions
    /// change; selection, visibility, animation and score are untouched.
    pub fn relayout(&mut self) -> f32 {
        let layout = layout::compute(self.viewport, TRIPLE_SIZE);
        if let Some(class) = self.classes.get_mut(self.round) {
            class.set_position(layout.class_pos);
        }
        let triple = self.active_triple();
        if let Some(cards) = self.interfaces.get_mut(triple) {
            for (card, pos) in cards.iter_mut().zip(&layout.interface_pos) {
                card.set_position(*pos);
            }
        }
        self.content_height = layout.content_height;
        self.content_height
    }

    // === Transitions ===

    /// Route a click: interfaces first, then the active class, else clear.
    /// Once complete, any click restarts.
    pub fn handle_click(&mut self, p: Vec2) -> ClickTarget {
        if self.phase == GamePhase::Complete {
            self.restart();
            return ClickTarget::Restart;
        }

        if let Some(id) = self.interfaces.iter().position(|c| c.contains_point(p)) {
            log::debug!("Click ({}, {}) hit interface {}", p.x, p.y, id);
            self.select_interface(id);
            return ClickTarget::Interface(id);
        }

        if let Some(id) = self.classes.iter().position(|c| c.contains_point(p)) {
            log::debug!("Click ({}, {}) hit class {}", p.x, p.y, id);
            self.select_class(id);
            return ClickTarget::Class(id);
        }

        log::debug!("Click ({}, {}) hit empty space", p.x, p.y);
        self.clear_selection();
        self.events.push(GameEvent::SelectionCleared);
        ClickTarget::Empty
    }

    /// Pick the round's class card; required before choosing an interface
    pub fn select_class(&mut self, id: usize) {
        if self.phase == GamePhase::Complete {
            return;
        }
        if !self.classes.get(id).is_some_and(Card::is_shown) {
            return;
        }

        self.clear_selection();
        self.classes[id].selected = true;
        self.selected_card = Some(id);
        if self.phase == GamePhase::Tutorial {
            self.phase = GamePhase::Play;
        }

        let title = self.classes[id].title.clone();
        self.show_message(format!(
            "Selected: {title}. Now choose 1 interface it implements!"
        ));
        self.events.push(GameEvent::ClassSelected { class: id });
    }

    /// Toggle an interface card. A single selection is evaluated at once; a
    /// second selection is refused and the first one stays.
    pub fn select_interface(&mut self, id: usize) {
        if self.selected_card.is_none() || self.phase == GamePhase::Complete {
            return;
        }
        if !self.interfaces.get(id).is_some_and(Card::is_shown) {
            return;
        }

        if self.interfaces[id].selected {
            self.interfaces[id].selected = false;
        } else if self.interfaces.iter().any(Card::is_selected) {
            // Would make two; the new one never becomes selected
            self.show_message("❌ You can only select 1 interface.");
            self.events.push(GameEvent::InterfaceRejected { interface: id });
            return;
        } else {
            self.interfaces[id].selected = true;
        }

        match self.interfaces.iter().filter(|c| c.is_selected()).count() {
            1 => self.evaluate_guess(),
            n => self.show_message(format!("Selected {n}/1 interface. Select 1.")),
        }
    }

    /// Score the single selected interface against this round's answer
    pub fn evaluate_guess(&mut self) {
        let selected = self.selected_interfaces();
        let &[guess] = selected.as_slice() else {
            self.show_message("❌ Please select exactly 1 interface!");
            return;
        };
        let Some(correct) = self.correct_interface() else {
            return;
        };

        let round = self.round;
        if guess == correct {
            let points = points_for_retries(self.retry_count);
            self.score += points;
            self.events.push(GameEvent::RoundCleared { round, points });
            log::info!(
                "Round {} cleared after {} wrong guesses (+{}, score {})",
                round + 1,
                self.retry_count,
                points,
                self.score
            );

            let success = format!(
                "✅ Correct! {} implements {}. (+{points})",
                self.classes[round].title, self.interfaces[guess].name
            );
            self.advance_round();
            let next = match self.classes.get(self.round) {
                Some(class) if self.phase != GamePhase::Complete => {
                    format!("Next up: {}", class.title)
                }
                _ => format!("Final score: {}", self.score),
            };
            self.show_message(format!("{success} {next}"));
        } else {
            self.retry_count = (self.retry_count + 1).min(MAX_RETRIES);
            self.clear_interface_selection();
            self.events.push(GameEvent::WrongGuess {
                round,
                retries: self.retry_count,
            });
            log::debug!("Round {} wrong guess #{}", round + 1, self.retry_count);

            let hint = if self.retry_count == 1 {
                "One more try for 50 points."
            } else {
                "Further tries give 0 points."
            };
            self.show_message(format!("❌ Not quite right. {hint}"));
        }
    }

    /// Move to the next class, or finish the session after the last one
    pub fn advance_round(&mut self) {
        if self.phase == GamePhase::Complete {
            return;
        }
        if let Some(class) = self.classes.get_mut(self.round) {
            class.deactivate();
        }
        self.round += 1;
        self.clear_selection();

        if self.round < self.classes.len() {
            self.enter_round();
            let title = self.classes[self.round].title.clone();
            log::info!("Round {}/{}: {}", self.round + 1, self.classes.len(), title);
            self.show_message(format!("Great! Now let's work with: {title}"));
        } else {
            self.phase = GamePhase::Complete;
            self.classes.iter_mut().for_each(ClassCard::deactivate);
            self.interfaces.iter_mut().for_each(InterfaceCard::reset);
            log::info!("All {} rounds complete, final score {}", self.classes.len(), self.score);
            self.events.push(GameEvent::Completed { score: self.score });
            self.show_message(format!(
                "🎉 Congratulations! You have mastered all C# classes! Final score: {}",
                self.score
            ));
        }
    }

    /// Back to round 0 with a clean score
    pub fn restart(&mut self) {
        self.round = 0;
        self.score = 0;
        self.phase = GamePhase::Tutorial;
        self.retry_count = 0;
        self.clear_selection();
        self.enter_round();
        log::info!("Game restarted");
        self.events.push(GameEvent::Restarted);
        self.show_message("Game restarted! Click on the class to begin.");
    }

    /// Deselect every class and interface card
    pub fn clear_selection(&mut self) {
        self.classes.iter_mut().for_each(|c| c.selected = false);
        self.clear_interface_selection();
        self.selected_card = None;
    }

    pub fn clear_interface_selection(&mut self) {
        self.interfaces.iter_mut().for_each(|c| c.selected = false);
    }

    /// Replace the feedback line and restart its display timer
    pub fn show_message(&mut self, text: impl Into<String>) {
        self.feedback = Feedback {
            text: text.into(),
            timer: MESSAGE_DURATION,
        };
    }

    /// Activate the current class alone, reveal its triple, lay both out
    fn enter_round(&mut self) {
        self.retry_count = 0;
        let round = self.round;
        for class in &mut self.classes {
            if class.id == round {
                class.activate();
            } else {
                class.deactivate();
            }
        }
        self.interfaces.iter_mut().for_each(InterfaceCard::reset);
        let triple = self.active_triple();
        if let Some(cards) = self.interfaces.get_mut(triple) {
            cards.iter_mut().for_each(|c| c.visible = true);
        }
        self.relayout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassDef, InterfaceDef, RoundDef};
    use crate::sim::tick::tick;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(Catalog::default(), Viewport::new(800.0, 600.0))
    }

    /// Center of a card, clicked after its slide-in finished
    fn center_of(card: &impl Card) -> Vec2 {
        card.position() + card.size() / 2.0
    }

    fn settle(state: &mut GameState) {
        for _ in 0..30 {
            tick(state, SIM_DT);
        }
    }

    fn wrong_interface(state: &GameState) -> usize {
        let correct = state.correct_interface().unwrap();
        state.active_triple().find(|&i| i != correct).unwrap()
    }

    #[test]
    fn test_new_session() {
        let s = state();
        assert_eq!(s.phase(), GamePhase::Tutorial);
        assert_eq!(s.round(), 0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.retry_count(), 0);
        assert_eq!(s.classes().iter().filter(|c| c.active).count(), 1);
        assert!(s.classes()[0].active);
        let visible: Vec<usize> = s
            .interfaces()
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.id)
            .collect();
        assert_eq!(visible, vec![0, 1, 2]);
        assert_eq!(s.correct_interface(), Some(1));
    }

    #[test]
    fn test_interface_requires_class_selection() {
        let mut s = state();
        s.select_interface(1);
        assert!(s.selected_interfaces().is_empty());
        assert_eq!(s.score(), 0);
        assert_eq!(s.round(), 0);
    }

    #[test]
    fn test_select_class_names_it() {
        let mut s = state();
        s.select_class(0);
        assert!(s.classes()[0].selected);
        assert_eq!(s.selected_card(), Some(0));
        assert_eq!(s.phase(), GamePhase::Play);
        assert!(s.feedback().text.contains("Dog"));
        assert!(s.feedback().is_visible());
    }

    #[test]
    fn test_inactive_class_cannot_be_selected() {
        let mut s = state();
        s.select_class(3);
        assert_eq!(s.selected_card(), None);
        s.select_class(99);
        assert_eq!(s.selected_card(), None);
    }

    #[test]
    fn test_scoring_tiers() {
        for (wrong, expected) in [(0, 100), (1, 50), (2, 0), (3, 0)] {
            let mut s = state();
            s.select_class(0);
            for _ in 0..wrong {
                let w = wrong_interface(&s);
                s.select_interface(w);
            }
            assert_eq!(s.retry_count(), wrong.min(2) as u8);
            let correct = s.correct_interface().unwrap();
            s.select_interface(correct);
            assert_eq!(s.score(), expected, "after {wrong} wrong guesses");
            assert_eq!(s.round(), 1);
            assert_eq!(s.retry_count(), 0);
        }
    }

    #[test]
    fn test_wrong_guess_messages() {
        let mut s = state();
        s.select_class(0);
        s.select_interface(0);
        assert!(s.feedback().text.contains("50 points"));
        assert!(s.selected_interfaces().is_empty());
        s.select_interface(2);
        assert!(s.feedback().text.contains("0 points"));
        assert_eq!(s.retry_count(), 2);
        // Class stays selected between guesses
        assert_eq!(s.selected_card(), Some(0));
    }

    #[test]
    fn test_second_selection_is_refused() {
        let mut s = state();
        s.select_class(0);
        s.interfaces[0].selected = true;
        s.select_interface(2);
        assert_eq!(s.selected_interfaces(), vec![0]);
        assert!(s.feedback().text.contains("only select 1"));
        assert_eq!(s.score(), 0);
        assert_eq!(
            s.drain_events().last(),
            Some(&GameEvent::InterfaceRejected { interface: 2 })
        );
    }

    #[test]
    fn test_toggle_off_prompts() {
        let mut s = state();
        s.select_class(0);
        s.interfaces[0].selected = true;
        s.select_interface(0);
        assert!(s.selected_interfaces().is_empty());
        assert!(s.feedback().text.contains("0/1"));
    }

    #[test]
    fn test_correctness_is_by_identity() {
        let same = InterfaceDef {
            name: "IShape".into(),
            requirements: vec!["Area".into()],
        };
        let catalog = Catalog::new(vec![RoundDef {
            class: ClassDef {
                title: "Circle".into(),
                properties: vec![],
                methods: vec![],
            },
            interfaces: [same.clone(), same.clone(), same],
            correct: 2,
        }])
        .unwrap();
        let mut s = GameState::new(catalog, Viewport::new(800.0, 600.0));
        s.select_class(0);
        s.select_interface(0);
        assert_eq!(s.retry_count(), 1);
        assert_eq!(s.phase(), GamePhase::Play);
        s.select_interface(2);
        assert_eq!(s.phase(), GamePhase::Complete);
        assert_eq!(s.score(), 50);
    }

    #[test]
    fn test_round_advance_swaps_cards() {
        let mut s = state();
        s.select_class(0);
        s.select_interface(1);
        assert_eq!(s.round(), 1);
        assert!(!s.classes()[0].active);
        assert!(s.classes()[1].active);
        assert_eq!(s.selected_card(), None);
        assert!(s.interfaces()[0..3].iter().all(|c| !c.visible));
        assert!(s.interfaces()[3..6].iter().all(|c| c.visible && c.fade == 0.0));
        assert!(s.feedback().text.contains("+100"));
        assert!(s.feedback().text.contains("Car"));
    }

    #[test]
    fn test_click_routing() {
        let mut s = state();
        settle(&mut s);

        // Interface before class selection: routed but ignored
        let iface = center_of(&s.interfaces()[1]);
        assert_eq!(s.handle_click(iface), ClickTarget::Interface(1));
        assert_eq!(s.score(), 0);

        let class = center_of(&s.classes()[0]);
        assert_eq!(s.handle_click(class), ClickTarget::Class(0));
        assert_eq!(s.selected_card(), Some(0));

        assert_eq!(s.handle_click(Vec2::new(1.0, 1.0)), ClickTarget::Empty);
        assert_eq!(s.selected_card(), None);
        assert!(!s.classes()[0].selected);
    }

    #[test]
    fn test_completion_and_click_restart() {
        let mut s = state();
        for _ in 0..s.round_count() {
            let class = s.round();
            s.select_class(class);
            let correct = s.correct_interface().unwrap();
            s.select_interface(correct);
        }
        assert_eq!(s.phase(), GamePhase::Complete);
        assert_eq!(s.score(), 500);
        assert!(s.classes().iter().all(|c| !c.active));
        assert!(s.interfaces().iter().all(|c| !c.visible));
        assert_eq!(s.correct_interface(), None);
        assert!(s.feedback().text.contains("500"));

        // Operations other than click are inert once complete
        s.select_class(0);
        s.advance_round();
        assert_eq!(s.phase(), GamePhase::Complete);

        assert_eq!(s.handle_click(Vec2::new(5.0, 5.0)), ClickTarget::Restart);
        assert_eq!(s.phase(), GamePhase::Tutorial);
        assert_eq!(s.round(), 0);
        assert_eq!(s.score(), 0);
        assert!(s.classes()[0].active);
    }

    #[test]
    fn test_restart_matches_fresh_session() {
        let fresh = state();
        let mut s = state();
        s.select_class(0);
        s.select_interface(0);
        s.select_interface(1);
        s.select_class(1);
        s.select_interface(3);
        s.restart();

        assert_eq!(s.round(), fresh.round());
        assert_eq!(s.score(), fresh.score());
        assert_eq!(s.phase(), fresh.phase());
        assert_eq!(s.retry_count(), fresh.retry_count());
        assert_eq!(s.selected_card(), fresh.selected_card());
        assert_eq!(s.content_height(), fresh.content_height());
        for (a, b) in s.interfaces().iter().zip(fresh.interfaces()) {
            assert_eq!((a.visible, a.selected), (b.visible, b.selected));
        }
        for i in fresh.active_triple() {
            assert_eq!(s.interfaces()[i].pos, fresh.interfaces()[i].pos);
        }
        for (a, b) in s.classes().iter().zip(fresh.classes()) {
            assert_eq!((a.active, a.selected), (b.active, b.selected));
        }
    }

    #[test]
    fn test_resize_keeps_round_state() {
        let mut s = GameState::new(Catalog::default(), Viewport::new(1200.0, 600.0));
        s.select_class(0);
        s.select_interface(0);
        settle(&mut s);
        let before: Vec<_> = s
            .interfaces()
            .iter()
            .map(|c| (c.visible, c.selected, c.fade))
            .collect();

        s.set_viewport(Viewport::new(700.0, 600.0));

        let after: Vec<_> = s
            .interfaces()
            .iter()
            .map(|c| (c.visible, c.selected, c.fade))
            .collect();
        assert_eq!(before, after);
        assert_eq!(s.retry_count(), 1);
        assert_eq!(s.selected_card(), Some(0));
        assert_eq!(s.score(), 0);
        let xs: Vec<f32> = s.interfaces()[0..3].iter().map(|c| c.pos.x).collect();
        assert!(xs.iter().all(|&x| x == xs[0]));
    }

    #[test]
    fn test_shown_cards_never_overlap() {
        for width in [640.0, 800.0, 1200.0, 1600.0] {
            let mut s = GameState::new(Catalog::default(), Viewport::new(width, 700.0));
            for _ in 0..s.round_count() {
                let mut rects: Vec<_> = s
                    .classes()
                    .iter()
                    .filter(|c| c.is_shown())
                    .map(Card::bounds)
                    .collect();
                rects.extend(s.interfaces().iter().filter(|c| c.is_shown()).map(Card::bounds));
                assert_eq!(rects.len(), 1 + TRIPLE_SIZE);
                for (i, a) in rects.iter().enumerate() {
                    for b in &rects[i + 1..] {
                        assert!(!a.overlaps(b), "{a:?} overlaps {b:?} at width {width}");
                    }
                }
                s.select_class(s.round());
                let correct = s.correct_interface().unwrap();
                s.select_interface(correct);
            }
            assert_eq!(s.phase(), GamePhase::Complete);
        }
    }

    #[test]
    fn test_events_are_drained() {
        let mut s = state();
        s.select_class(0);
        s.select_interface(0);
        s.select_interface(1);
        assert_eq!(
            s.drain_events(),
            vec![
                GameEvent::ClassSelected { class: 0 },
                GameEvent::WrongGuess { round: 0, retries: 1 },
                GameEvent::RoundCleared { round: 0, points: 50 },
            ]
        );
        assert!(s.drain_events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_under_random_clicks(
            clicks in prop::collection::vec((0.0f32..1300.0, 0.0f32..900.0), 0..200),
            wide in any::<bool>(),
        ) {
            let width = if wide { 1200.0 } else { 800.0 };
            let mut s = GameState::new(Catalog::default(), Viewport::new(width, 700.0));
            let mut last_score = 0;
            let mut last_round = 0;
            for (x, y) in clicks {
                tick(&mut s, SIM_DT);
                let target = s.handle_click(Vec2::new(x, y));

                prop_assert!(s.selected_interfaces().len() <= 1);
                prop_assert!(s.retry_count() <= MAX_RETRIES);
                let active = s.classes().iter().filter(|c| c.active).count();
                if s.phase() == GamePhase::Complete {
                    prop_assert_eq!(active, 0);
                } else {
                    prop_assert_eq!(active, 1);
                }
                if target != ClickTarget::Restart {
                    prop_assert!(s.score() >= last_score);
                    prop_assert!(s.round() >= last_round);
                }
                last_score = s.score();
                last_round = s.round();
            }
        }
    }
}
