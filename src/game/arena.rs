use rand::rngs::StdRng;
use std::sync::Arc;

use super::bird::Bird;
use super::config::GameConfig;
use super::floor::Floor;
use super::pipe::Pipe;
use super::snapshot::{ArenaSnapshot, BirdView, PipeView};
use super::sprites::{BIRD_HEIGHT, Sprites};
use super::stop::StopSignal;
use crate::neuro::{Policy, create_observation};

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    Running,
    Finished,
}

/// Why a bird left the live set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elimination {
    /// Flew into a pipe (penalised)
    Collision,
    /// Sank into the floor
    Floor,
    /// Rose above the ceiling
    Ceiling,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// A pipe was passed and a new one spawned
    pub pipe_passed: bool,
    /// Members removed this tick, in the order they were found
    pub eliminated: Vec<(usize, Elimination)>,
    pub state: EpisodeState,
    /// The tick was cut short by a stop request
    pub stopped: bool,
}

impl TickReport {
    fn idle(tick: u64, state: EpisodeState, stopped: bool) -> Self {
        Self {
            tick,
            pipe_passed: false,
            eliminated: Vec::new(),
            state,
            stopped,
        }
    }
}

/// A live bird together with the policy flying it
struct Contestant<P> {
    member: usize,
    bird: Bird,
    policy: P,
}

/// One episode: every member of a generation flying the same course
///
/// Fitness is accumulated per member index and stays readable after the
/// member's bird has been eliminated.
pub struct Arena<P: Policy> {
    config: GameConfig,
    sprites: Arc<Sprites>,
    generation: usize,
    contestants: Vec<Contestant<P>>,
    fitness: Vec<f64>,
    pipes: Vec<Pipe>,
    floor: Floor,
    tracked: usize,
    score: u32,
    ticks: u64,
    state: EpisodeState,
    rng: StdRng,
}

impl<P: Policy> Arena<P> {
    /// Spawn one bird per policy at the configured spawn point
    ///
    /// An arena with no policies starts out finished.
    pub fn new(
        config: &GameConfig,
        sprites: Arc<Sprites>,
        generation: usize,
        policies: Vec<P>,
        mut rng: StdRng,
    ) -> Self {
        let contestants: Vec<Contestant<P>> = policies
            .into_iter()
            .enumerate()
            .map(|(member, policy)| Contestant {
                member,
                bird: Bird::new(config.spawn_x, config.spawn_y),
                policy,
            })
            .collect();

        let state = if contestants.is_empty() {
            EpisodeState::Finished
        } else {
            EpisodeState::Running
        };

        Self {
            config: config.clone(),
            sprites,
            generation,
            fitness: vec![0.0; contestants.len()],
            contestants,
            pipes: vec![Pipe::new(config.first_pipe_x, &mut rng)],
            floor: Floor::new(config.floor_y),
            tracked: 0,
            score: 0,
            ticks: 0,
            state,
            rng,
        }
    }

    /// Advance the episode by one tick
    ///
    /// Every bird moves and decides before any of them is eliminated. A
    /// pending stop request finishes the episode without touching positions
    /// or fitness.
    pub fn tick(&mut self, stop: &StopSignal) -> TickReport {
        if self.state == EpisodeState::Finished {
            return TickReport::idle(self.ticks, self.state, false);
        }

        if stop.is_requested() {
            self.state = EpisodeState::Finished;
            return TickReport::idle(self.ticks, self.state, true);
        }

        self.ticks += 1;

        // Only advances past the first pipe, never further
        self.tracked = match (self.contestants.first(), self.pipes.get(1)) {
            (Some(lead), Some(_)) if lead.bird.x > self.pipes[0].right_edge() => 1,
            _ => 0,
        };

        for contestant in &mut self.contestants {
            self.fitness[contestant.member] += self.config.survival_reward;
            contestant.bird.step();

            if let Some(pipe) = self.pipes.get(self.tracked) {
                let observation = create_observation(&contestant.bird, pipe);
                if contestant.policy.decide(&observation) {
                    contestant.bird.jump();
                }
            }
        }

        self.floor.step();

        let mut eliminated = Vec::new();
        let mut hit = vec![false; self.contestants.len()];
        let mut retired = vec![false; self.pipes.len()];
        let mut spawn = false;

        for (pipe, retired) in self.pipes.iter_mut().zip(retired.iter_mut()) {
            pipe.step();

            for (contestant, hit) in self.contestants.iter().zip(hit.iter_mut()) {
                if *hit {
                    continue;
                }

                if pipe.collides_with(&contestant.bird, &self.sprites) {
                    self.fitness[contestant.member] -= self.config.collision_penalty;
                    *hit = true;
                    eliminated.push((contestant.member, Elimination::Collision));
                    continue;
                }

                if !pipe.passed && pipe.x < contestant.bird.x {
                    pipe.passed = true;
                    spawn = true;
                }
            }

            if pipe.is_off_screen() {
                *retired = true;
            }
        }

        let mut hit = hit.into_iter();
        self.contestants.retain(|_| !hit.next().unwrap_or(false));

        if spawn {
            self.score += 1;
            for contestant in &self.contestants {
                self.fitness[contestant.member] += self.config.pass_reward;
            }
            self.pipes
                .push(Pipe::new(self.config.window_width, &mut self.rng));
        }

        // New pipes sit past the end of `retired` and are always kept
        let mut retired = retired.into_iter();
        self.pipes.retain(|_| !retired.next().unwrap_or(false));

        let floor_limit = self.floor.y;
        let ceiling = self.config.ceiling_y;
        let sink = BIRD_HEIGHT as f32 - self.config.floor_margin;
        self.contestants.retain(|contestant| {
            let bird = &contestant.bird;
            if bird.y + sink >= floor_limit {
                eliminated.push((contestant.member, Elimination::Floor));
                false
            } else if bird.y < ceiling {
                eliminated.push((contestant.member, Elimination::Ceiling));
                false
            } else {
                true
            }
        });

        if self.contestants.is_empty() {
            self.state = EpisodeState::Finished;
        }

        TickReport {
            tick: self.ticks,
            pipe_passed: spawn,
            eliminated,
            state: self.state,
            stopped: false,
        }
    }

    /// End the episode now, leaving fitness as it stands
    pub fn halt(&mut self) {
        self.state = EpisodeState::Finished;
    }

    /// Read-only view of the current tick for drawing
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            generation: self.generation,
            tick: self.ticks,
            score: self.score,
            birds: self
                .contestants
                .iter()
                .map(|c| BirdView {
                    member: c.member,
                    x: c.bird.x,
                    y: c.bird.y,
                    tilt: c.bird.tilt,
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|p| PipeView {
                    x: p.x,
                    gap_top: p.gap_top(),
                    gap_bottom: p.gap_bottom(),
                    passed: p.passed,
                })
                .collect(),
            tracked_pipe: self.tracked,
            field_width: self.config.window_width,
            field_height: self.config.window_height,
            floor_y: self.floor.y,
            floor_tiles: [self.floor.x1, self.floor.x2],
            finished: self.is_finished(),
        }
    }

    /// Accumulated fitness, indexed by member
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn into_fitness(self) -> Vec<f64> {
        self.fitness
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn alive(&self) -> usize {
        self.contestants.len()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == EpisodeState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuro::Observation;
    use rand::SeedableRng;

    type BoxedPolicy = Box<dyn FnMut(&Observation) -> bool>;

    fn arena(policies: Vec<BoxedPolicy>) -> Arena<BoxedPolicy> {
        Arena::new(
            &GameConfig::default(),
            Arc::new(Sprites::new()),
            0,
            policies,
            StdRng::seed_from_u64(42),
        )
    }

    fn never() -> BoxedPolicy {
        Box::new(|_: &Observation| false)
    }

    fn always() -> BoxedPolicy {
        Box::new(|_: &Observation| true)
    }

    fn run(arena: &mut Arena<BoxedPolicy>, stop: &StopSignal) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while !arena.is_finished() {
            reports.push(arena.tick(stop));
        }
        reports
    }

    #[test]
    fn test_empty_arena_starts_finished() {
        let arena = arena(Vec::new());
        assert!(arena.is_finished());
        assert!(arena.fitness().is_empty());
    }

    #[test]
    fn test_idle_bird_hits_floor_at_tick_24() {
        let mut arena = arena(vec![never()]);
        let stop = StopSignal::new();

        for _ in 0..23 {
            let report = arena.tick(&stop);
            assert!(report.eliminated.is_empty());
        }
        assert_eq!(arena.snapshot().birds[0].y, 691.0);

        let report = arena.tick(&stop);
        assert_eq!(report.tick, 24);
        assert_eq!(report.eliminated, vec![(0, Elimination::Floor)]);
        assert_eq!(report.state, EpisodeState::Finished);

        // 24 survival rewards and no penalty
        assert!((arena.fitness()[0] - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_always_jumping_bird_never_reaches_floor() {
        let mut arena = arena(vec![always()]);
        let reports = run(&mut arena, &StopSignal::new());

        let last = reports.last().unwrap();
        assert_eq!(last.eliminated, vec![(0, Elimination::Ceiling)]);
        assert_eq!(arena.score(), 0);
        // Leaving through the ceiling costs nothing beyond the lost ticks
        assert!((arena.fitness()[0] - last.tick as f64 * 0.1).abs() < 1e-9);
        assert!(
            reports
                .iter()
                .flat_map(|r| &r.eliminated)
                .all(|(_, cause)| *cause != Elimination::Floor)
        );
    }

    #[test]
    fn test_collision_penalises_only_the_colliding_bird() {
        let mut arena = arena(vec![never(), never()]);
        // Gap from 300 to 500, pipe overlapping the birds horizontally
        arena.pipes[0] = Pipe::with_gap_top(245.0, 300.0);
        arena.contestants[1].bird.y = 100.0;

        let report = arena.tick(&StopSignal::new());

        assert_eq!(report.eliminated, vec![(1, Elimination::Collision)]);
        assert_eq!(arena.alive(), 1);
        assert!((arena.fitness()[0] - 0.1).abs() < 1e-9);
        assert!((arena.fitness()[1] - (0.1 - 1.0)).abs() < 1e-9);

        let report = arena.tick(&StopSignal::new());
        assert!(report.eliminated.is_empty());
        assert!((arena.fitness()[0] - 0.2).abs() < 1e-9);
        assert!((arena.fitness()[1] - (0.1 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pass_rewards_every_live_bird() {
        let mut arena = arena(vec![never(), never()]);
        arena.pipes[0] = Pipe::with_gap_top(226.0, 300.0);

        let report = arena.tick(&StopSignal::new());

        assert!(report.pipe_passed);
        assert_eq!(arena.score(), 1);
        assert_eq!(arena.pipes.len(), 2);
        assert_eq!(arena.pipes[1].x, 600.0);
        for fitness in arena.fitness() {
            assert!((fitness - 5.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_colliding_bird_misses_pass_bonus() {
        let mut arena = arena(vec![never(), never()]);
        arena.pipes[0] = Pipe::with_gap_top(226.0, 300.0);
        arena.contestants[0].bird.y = 100.0;

        let report = arena.tick(&StopSignal::new());

        assert!(report.pipe_passed);
        assert_eq!(report.eliminated, vec![(0, Elimination::Collision)]);
        assert_eq!(arena.score(), 1);
        assert!((arena.fitness()[0] - (0.1 - 1.0)).abs() < 1e-9);
        assert!((arena.fitness()[1] - 5.1).abs() < 1e-9);
    }

    #[test]
    fn test_colliding_bird_cannot_pass_a_pipe() {
        let mut arena = arena(vec![never()]);
        arena.pipes[0] = Pipe::with_gap_top(226.0, 300.0);
        arena.contestants[0].bird.y = 100.0;

        let report = arena.tick(&StopSignal::new());

        assert!(!report.pipe_passed);
        assert_eq!(report.eliminated, vec![(0, Elimination::Collision)]);
        assert_eq!(arena.score(), 0);
        assert_eq!(arena.pipes.len(), 1);
        assert!((arena.fitness()[0] - (0.1 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_score_counts_each_pass_once() {
        let mut arena = arena(vec![never()]);
        arena.pipes[0] = Pipe::with_gap_top(226.0, 300.0);
        let stop = StopSignal::new();

        arena.tick(&stop);
        assert_eq!(arena.score(), 1);
        for _ in 0..5 {
            let report = arena.tick(&stop);
            assert!(!report.pipe_passed);
        }
        assert_eq!(arena.score(), 1);
    }

    #[test]
    fn test_tracked_pipe_advances_after_lead_bird_clears_it() {
        let mut arena = arena(vec![never()]);
        arena.pipes[0] = Pipe::with_gap_top(120.0, 300.0);
        arena.pipes.push(Pipe::with_gap_top(500.0, 200.0));
        arena.pipes[0].passed = true;

        arena.tick(&StopSignal::new());
        assert_eq!(arena.snapshot().tracked_pipe, 1);
    }

    #[test]
    fn test_stop_signal_finishes_without_changing_fitness() {
        let mut arena = arena(vec![never(), always()]);
        let stop = StopSignal::new();
        arena.tick(&stop);
        arena.tick(&stop);
        let before = arena.fitness().to_vec();
        let snapshot = arena.snapshot();

        stop.request();
        let report = arena.tick(&stop);

        assert!(report.stopped);
        assert_eq!(report.state, EpisodeState::Finished);
        assert_eq!(arena.fitness(), before.as_slice());
        assert_eq!(arena.snapshot().birds, snapshot.birds);
        assert_eq!(arena.ticks(), 2);
    }

    #[test]
    fn test_finished_only_when_no_birds_remain() {
        let mut arena = arena(vec![never(), always()]);
        let stop = StopSignal::new();

        while !arena.is_finished() {
            let report = arena.tick(&stop);
            assert_eq!(report.state == EpisodeState::Finished, arena.alive() == 0);
        }
        assert_eq!(arena.alive(), 0);
        assert_eq!(arena.snapshot().birds.len(), 0);
    }

    #[test]
    fn test_policy_sees_tracked_pipe() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        let policy: BoxedPolicy = Box::new(move |obs: &Observation| {
            log.borrow_mut().push(*obs);
            false
        });

        let mut arena = arena(vec![policy]);
        arena.pipes[0] = Pipe::with_gap_top(700.0, 300.0);
        arena.tick(&StopSignal::new());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].height, 351.5);
        assert_eq!(seen[0].gap_top_distance, 51.5);
        assert_eq!(seen[0].gap_bottom_distance, 148.5);
    }
}
