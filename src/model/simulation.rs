//! Simulation step controller and canned step visuals

use super::catalog::ExperimentId;

/// What `next()` does on the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishBehavior {
    /// Stay on the last step silently
    #[default]
    Stop,
    /// Stay on the last step and report `StepOutcome::Finished`
    Signal,
}

/// Result of a step move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// `previous()` at the first step
    AtStart,
    /// `next()` at the last step with `FinishBehavior::Stop`
    AtEnd,
    /// `next()` at the last step with `FinishBehavior::Signal`
    Finished,
}

/// Bounded index into an experiment's procedure steps.
///
/// The index stays within `[0, len - 1]`; with no steps it is pinned at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStepState {
    index: usize,
    len: usize,
    finish: FinishBehavior,
}

impl SimulationStepState {
    pub fn new(len: usize, finish: FinishBehavior) -> Self {
        Self {
            index: 0,
            len,
            finish,
        }
    }

    /// Start over for a procedure of `len` steps
    pub fn reset(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    pub fn next(&mut self) -> StepOutcome {
        if !self.is_last() {
            self.index += 1;
            return StepOutcome::Moved;
        }
        match self.finish {
            FinishBehavior::Stop => StepOutcome::AtEnd,
            FinishBehavior::Signal if self.is_empty() => StepOutcome::AtEnd,
            FinishBehavior::Signal => StepOutcome::Finished,
        }
    }

    pub fn previous(&mut self) -> StepOutcome {
        if self.index == 0 {
            return StepOutcome::AtStart;
        }
        self.index -= 1;
        StepOutcome::Moved
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Step Visuals
// ═══════════════════════════════════════════════════════════════════════════════

/// Colour family used when drawing a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Specimen,
    Stain,
    Reagent,
    Result,
}

/// Static illustration for one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepVisual {
    pub art: &'static [&'static str],
    pub caption: &'static str,
    pub tone: Tone,
}

const BULB: &[&str] = &["   .---.   ", "  /     \\  ", " |  ( )  | ", "  \\     /  ", "   '---'   "];
const PEEL: &[&str] = &["  ~~~~~~~  ", " ~ thin  ~ ", "  ~~~~~~~  "];
const SLIDE: &[&str] = &["+-----------+", "|   ~~~~~   |", "+-----------+"];
const STAINED: &[&str] = &["+-----------+", "|  #######  |", "+-----------+"];
const COVERED: &[&str] = &["  _________  ", "+-----------+", "|  #######  |", "+-----------+"];
const MICROSCOPE: &[&str] = &["   [=]   ", "    |    ", "  (( ))  ", " [#####] ", "  /   \\  "];
const CELLS: &[&str] = &["+--+--+--+--+", "|o |o | o| o|", "+--+--+--+--+", "| o|o |o | o|", "+--+--+--+--+"];
const ROOT_TIPS: &[&str] = &["  |  |  |  ", "  |  |  |  ", "  v  v  v  "];
const BEAKER: &[&str] = &[" |       | ", " |~~~~~~~| ", " |       | ", " '-------' "];
const SQUASH: &[&str] = &["  _______  ", " (  ***  ) ", "  -------  "];
const STAGES: &[&str] = &[" (X)  =|=  <  >  ()() ", " pro  meta  ana  telo "];
const MASH: &[&str] = &["  \\  |  /  ", "  [:::::]  ", "  '-----'  "];
const FILTER: &[&str] = &["  \\~~~~~/  ", "   \\   /   ", "    | |    ", "   [___]   "];
const LAYERED: &[&str] = &["   |   |   ", "   |...|   ", "   |~~~|   ", "   '---'   "];
const SPOOL: &[&str] = &["     |     ", "   ~~|~~   ", "  ~~~|~~~  ", "     o     "];

/// Canned visual for a step, hard-coded per experiment.
/// `None` means the viewer falls back to the step's procedure text.
pub fn step_visual(experiment: &ExperimentId, index: usize) -> Option<StepVisual> {
    let (art, caption, tone) = match (experiment.as_str(), index) {
        ("onion-peel", 0) => (BULB, "Peel onion layer, then press n", Tone::Specimen),
        ("onion-peel", 1) => (PEEL, "Thin transparent peel lifted", Tone::Specimen),
        ("onion-peel", 2) => (SLIDE, "Slide with peel ready", Tone::Neutral),
        ("onion-peel", 3) => (STAINED, "Iodine stain added", Tone::Stain),
        ("onion-peel", 4) => (COVERED, "Coverslip lowered at an angle", Tone::Neutral),
        ("onion-peel", 5) => (CELLS, "Rectangular cells with stained nuclei", Tone::Result),

        ("mitosis", 0) => (ROOT_TIPS, "Root tips cut", Tone::Specimen),
        ("mitosis", 1) => (BEAKER, "Tips resting in fixative", Tone::Reagent),
        ("mitosis", 2) => (BEAKER, "Softening in dilute HCl", Tone::Reagent),
        ("mitosis", 3) => (ROOT_TIPS, "Tips stained with acetocarmine", Tone::Stain),
        ("mitosis", 4) => (SQUASH, "Root tip squashed under coverslip", Tone::Neutral),
        ("mitosis", 5) => (STAGES, "Mitotic stages visible", Tone::Result),

        ("dna-extract", 0) => (MASH, "Tissue mashed in buffer", Tone::Specimen),
        ("dna-extract", 1) => (FILTER, "Filtrate collected", Tone::Reagent),
        ("dna-extract", 2) => (LAYERED, "Cold ethanol layered on top", Tone::Reagent),
        ("dna-extract", 3) => (SPOOL, "White DNA strands spooled", Tone::Result),
        ("dna-extract", 4) => (MICROSCOPE, "Dried strands under observation", Tone::Result),

        _ => return None,
    };
    Some(StepVisual { art, caption, tone })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_clamps_at_last_step() {
        let mut steps = SimulationStepState::new(3, FinishBehavior::Stop);
        for _ in 0..10 {
            steps.next();
        }
        assert_eq!(steps.index(), 2);
        assert!(steps.is_last());
        assert_eq!(steps.next(), StepOutcome::AtEnd);
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let mut steps = SimulationStepState::new(3, FinishBehavior::Stop);
        assert_eq!(steps.previous(), StepOutcome::AtStart);
        steps.next();
        steps.next();
        for _ in 0..10 {
            steps.previous();
        }
        assert_eq!(steps.index(), 0);
    }

    #[test]
    fn test_index_stays_in_bounds_for_mixed_calls() {
        let mut steps = SimulationStepState::new(6, FinishBehavior::Signal);
        let pattern = [true, true, false, true, true, true, true, true, true, false, false];
        for _ in 0..5 {
            for forward in pattern {
                if forward {
                    steps.next();
                } else {
                    steps.previous();
                }
                assert!(steps.index() < steps.len());
            }
        }
    }

    #[test]
    fn test_finish_signal_on_last_step() {
        let mut steps = SimulationStepState::new(2, FinishBehavior::Signal);
        assert_eq!(steps.next(), StepOutcome::Moved);
        assert_eq!(steps.next(), StepOutcome::Finished);
        assert_eq!(steps.index(), 1);
    }

    #[test]
    fn test_empty_procedure_is_pinned() {
        let mut steps = SimulationStepState::new(0, FinishBehavior::Signal);
        assert_eq!(steps.next(), StepOutcome::AtEnd);
        assert_eq!(steps.previous(), StepOutcome::AtStart);
        assert_eq!(steps.index(), 0);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut steps = SimulationStepState::new(5, FinishBehavior::Stop);
        steps.next();
        steps.next();
        steps.reset(4);
        assert_eq!(steps.index(), 0);
        assert_eq!(steps.len(), 4);
    }

    #[test]
    fn test_step_visuals_are_per_experiment() {
        let onion = ExperimentId::new("onion-peel");
        assert_eq!(step_visual(&onion, 2).unwrap().caption, "Slide with peel ready");
        assert_eq!(step_visual(&onion, 3).unwrap().tone, Tone::Stain);
        assert!(step_visual(&onion, 6).is_none());
        assert!(step_visual(&ExperimentId::new("pcr"), 0).is_none());
    }
}
