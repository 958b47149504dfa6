use std::time::{Duration, Instant};

/// Default hold time before a key starts repeating.
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(450);

struct Binding<K, C> {
    key: K,
    command: C,
    /// When the current press started; `None` while the key is up.
    pressed_at: Option<Instant>,
    /// Ticks elapsed during the current press; repeats fire only on even
    /// counts, halving the effective repeat rate.
    slow_timer: u32,
}

/// Turns raw "key held" signals into discrete command firings: an immediate
/// fire on the press edge, then repeats once the hold time exceeds the
/// delay, gated to every other tick.
///
/// The repeater never touches editor state; `tick` returns the commands to
/// dispatch and the caller applies them to the session.
pub struct KeyRepeater<K, C> {
    bindings: Vec<Binding<K, C>>,
    delay: Duration,
}

impl<K: PartialEq, C: Clone> KeyRepeater<K, C> {
    pub fn new(delay: Duration) -> Self {
        Self {
            bindings: Vec::new(),
            delay,
        }
    }

    /// Bind a key to the command it fires. One command per key.
    pub fn register(&mut self, key: K, command: C) {
        self.bindings.push(Binding {
            key,
            command,
            pressed_at: None,
            slow_timer: 0,
        });
    }

    pub fn is_bound(&self, key: &K) -> bool {
        self.bindings.iter().any(|b| b.key == *key)
    }

    /// Advance one frame. `just_pressed` and `held` report the current key
    /// state; the returned commands are those due this tick.
    pub fn tick<F, G>(&mut self, now: Instant, just_pressed: F, held: G) -> Vec<C>
    where
        F: Fn(&K) -> bool,
        G: Fn(&K) -> bool,
    {
        let mut fired = Vec::new();
        for b in &mut self.bindings {
            if just_pressed(&b.key) {
                b.slow_timer = b.slow_timer.wrapping_add(1);
                b.pressed_at = Some(now);
                fired.push(b.command.clone());
            } else if held(&b.key) {
                b.slow_timer = b.slow_timer.wrapping_add(1);
                let start = *b.pressed_at.get_or_insert(now);
                if now.duration_since(start) > self.delay && b.slow_timer % 2 == 0 {
                    fired.push(b.command.clone());
                }
            } else {
                b.pressed_at = None;
                b.slow_timer = 0;
            }
        }
        fired
    }
}

impl<K: PartialEq, C: Clone> Default for KeyRepeater<K, C> {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn repeater() -> KeyRepeater<&'static str, u32> {
        let mut r = KeyRepeater::new(Duration::from_millis(450));
        r.register("left", 1);
        r.register("del", 2);
        r
    }

    #[test]
    fn fires_once_on_press_edge() {
        let mut r = repeater();
        let t0 = Instant::now();
        assert_eq!(r.tick(t0, |k| *k == "left", |_| false), vec![1]);
        // still held, but well within the delay: nothing
        assert_eq!(r.tick(t0 + 16 * MS, |_| false, |k| *k == "left"), vec![]);
        assert_eq!(r.tick(t0 + 32 * MS, |_| false, |k| *k == "left"), vec![]);
    }

    #[test]
    fn repeats_after_delay_on_alternating_ticks() {
        let mut r = repeater();
        let t0 = Instant::now();
        r.tick(t0, |k| *k == "left", |_| false); // press, slow_timer = 1
        let mut fired = 0;
        for i in 1..=6 {
            let now = t0 + Duration::from_millis(500 + i * 16);
            fired += r.tick(now, |_| false, |k| *k == "left").len();
        }
        // past the delay every tick qualifies, but the parity gate halves it
        assert_eq!(fired, 3);
    }

    #[test]
    fn release_resets_the_cadence() {
        let mut r = repeater();
        let t0 = Instant::now();
        r.tick(t0, |k| *k == "left", |_| false);
        // key released: timers reset
        assert_eq!(r.tick(t0 + 600 * MS, |_| false, |_| false), vec![]);
        // a fresh press fires immediately and waits for the delay again
        assert_eq!(
            r.tick(t0 + 700 * MS, |k| *k == "left", |_| false),
            vec![1]
        );
        assert_eq!(
            r.tick(t0 + 716 * MS, |_| false, |k| *k == "left"),
            vec![]
        );
    }

    #[test]
    fn bindings_are_independent() {
        let mut r = repeater();
        let t0 = Instant::now();
        let fired = r.tick(t0, |k| *k == "left" || *k == "del", |_| false);
        assert_eq!(fired, vec![1, 2]);
        // only "del" stays held past the delay
        let mut del_fired = 0;
        for i in 1..=4 {
            let now = t0 + Duration::from_millis(500 + i * 16);
            let fired = r.tick(now, |_| false, |k| *k == "del");
            assert!(!fired.contains(&1));
            del_fired += fired.len();
        }
        assert_eq!(del_fired, 2);
    }

    #[test]
    fn is_bound() {
        let r = repeater();
        assert!(r.is_bound(&"left"));
        assert!(!r.is_bound(&"right"));
    }
}
