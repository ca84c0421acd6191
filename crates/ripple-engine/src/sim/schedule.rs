/// What to run on a given rendered frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct StepPlan {
    pub step: bool,
    pub smooth: bool,
}

/// Frame-skip and smoothing cadence.
///
/// The simulation steps on every `frame_skip`-th rendered frame; every
/// `smoothing`-th step is followed by a smoothing pass.
#[derive(Debug, Clone)]
pub struct StepSchedule {
    frame_skip: u32,
    smoothing: Option<u32>,
    frames: u64,
    steps: u64,
}

impl StepSchedule {
    pub fn new(frame_skip: u32, smoothing: Option<u32>) -> Self {
        Self {
            frame_skip: frame_skip.max(1),
            smoothing: smoothing.map(|n| n.max(1)),
            frames: 0,
            steps: 0,
        }
    }

    /// Consumes one rendered frame.
    pub fn advance(&mut self) -> StepPlan {
        let frame = self.frames;
        self.frames += 1;

        if frame % self.frame_skip as u64 != 0 {
            return StepPlan::default();
        }

        self.steps += 1;
        let smooth = self
            .smoothing
            .is_some_and(|every| self.steps % every as u64 == 0);

        StepPlan { step: true, smooth }
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_frame_by_default() {
        let mut s = StepSchedule::new(1, None);
        for _ in 0..5 {
            assert_eq!(s.advance(), StepPlan { step: true, smooth: false });
        }
        assert_eq!(s.steps(), 5);
    }

    #[test]
    fn frame_skip_steps_on_first_of_each_group() {
        let mut s = StepSchedule::new(3, None);
        let steps: Vec<bool> = (0..7).map(|_| s.advance().step).collect();
        assert_eq!(steps, [true, false, false, true, false, false, true]);
    }

    #[test]
    fn smoothing_follows_every_nth_step() {
        let mut s = StepSchedule::new(2, Some(2));
        let plans: Vec<StepPlan> = (0..8).map(|_| s.advance()).collect();
        let smoothed: Vec<usize> = plans
            .iter()
            .enumerate()
            .filter(|(_, p)| p.smooth)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(smoothed, [2, 6]);
        assert!(plans.iter().all(|p| !p.smooth || p.step));
    }
}
