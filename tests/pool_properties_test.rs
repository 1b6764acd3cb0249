use dongle_drop::core::{
    AudioChannelRing, MemoryStore, MuteChannel, Pooled, ResourcePool, ScoreStore, ScoreTracker,
    SimpleRng,
};
use dongle_drop::types::{Sfx, MAX_SFX_CHANNELS};

#[derive(Debug, Default)]
struct Slot {
    busy: bool,
}

impl Pooled for Slot {
    fn in_use(&self) -> bool {
        self.busy
    }
}

#[test]
fn acquire_never_hands_out_a_busy_slot_and_never_shrinks() {
    for seed in 1..20 {
        let mut rng = SimpleRng::new(seed);
        let mut pool = ResourcePool::prewarm(3, |_| Slot::default());
        let mut len = pool.len();

        for _ in 0..500 {
            if rng.next_range(3) == 0 && !pool.is_empty() {
                let index = rng.next_range(pool.len() as u32) as usize;
                pool.get_mut(index).unwrap().busy = false;
                continue;
            }

            let index = pool.acquire(|_| Slot::default());
            let slot = pool.get_mut(index).unwrap();
            assert!(!slot.busy, "seed {seed}: acquired busy slot {index}");
            slot.busy = true;

            assert!(pool.len() >= len);
            len = pool.len();
        }
    }
}

#[test]
fn pool_grows_by_exactly_one_when_full() {
    let mut pool = ResourcePool::prewarm(4, |_| Slot::default());
    for _ in 0..4 {
        let index = pool.acquire(|_| Slot::default());
        pool.get_mut(index).unwrap().busy = true;
    }
    assert_eq!(pool.in_use_count(), 4);

    let grown = pool.acquire(|_| Slot::default());
    assert_eq!(grown, 4);
    assert_eq!(pool.len(), 5);
}

#[test]
fn channel_ring_is_round_robin() {
    let mut rng = SimpleRng::new(9);
    for size in 1..=MAX_SFX_CHANNELS {
        let mut ring = AudioChannelRing::new(std::iter::repeat(MuteChannel::default()).take(size));
        let used: Vec<usize> = (0..size)
            .map(|_| ring.play(Sfx::Next, &mut rng).unwrap())
            .collect();

        let mut distinct = used.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), size);

        assert_eq!(ring.play(Sfx::Attach, &mut rng), Some(used[0]));
    }
}

#[test]
fn persisted_best_is_running_maximum() {
    let scores = [40, 10, 90, 90, 5, 120, 0, 119];
    let mut tracker = ScoreTracker::new(MemoryStore::with_best(50));
    let mut expected = 50;

    for score in scores {
        tracker.reset_session();
        tracker.add_score(score);
        tracker.record_game_over();

        expected = expected.max(score);
        assert_eq!(tracker.store().load_best().unwrap(), Some(expected));
        assert_eq!(tracker.best(), expected);
    }
}
