//! Character-by-character text reveal with voice blips.

use rand::Rng;

use crate::core::GameConfig;

/// Reveals a line one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    revealed: usize,
    seconds_per_char: f32,
    banked: f32,
}

impl Typewriter {
    /// The first character shows on the first tick.
    pub fn new(text: &str, seconds_per_char: f32) -> Self {
        Self {
            chars: text.chars().collect(),
            revealed: 0,
            seconds_per_char,
            banked: seconds_per_char.max(0.0),
        }
    }

    /// Advance by `dt` seconds and return the characters revealed this tick,
    /// paired with their index in the line.
    pub fn tick(&mut self, dt: f32) -> Vec<(usize, char)> {
        if self.is_done() {
            return Vec::new();
        }
        let start = self.revealed;
        if self.seconds_per_char <= 0.0 {
            self.revealed = self.chars.len();
        } else {
            self.banked += dt;
            while self.banked >= self.seconds_per_char && self.revealed < self.chars.len() {
                self.banked -= self.seconds_per_char;
                self.revealed += 1;
            }
        }
        (start..self.revealed).map(|i| (i, self.chars[i])).collect()
    }

    pub fn finish(&mut self) {
        self.revealed = self.chars.len();
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= self.chars.len()
    }

    pub fn visible(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '¿' | '¡' | '…' | '«' | '»' | '“' | '”' | '—')
}

/// When a revealed character makes a sound, and at what pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlipSettings {
    pub chars_per_blip: usize,
    pub skip_spaces: bool,
    pub skip_punctuation: bool,
    pub pitch_variation: f32,
    pub volume: f32,
}

impl Default for BlipSettings {
    fn default() -> Self {
        Self {
            chars_per_blip: 2,
            skip_spaces: true,
            skip_punctuation: true,
            pitch_variation: 0.05,
            volume: 0.5,
        }
    }
}

impl BlipSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            chars_per_blip: config.chars_per_blip,
            skip_spaces: config.skip_spaces,
            skip_punctuation: config.skip_punctuation,
            pitch_variation: config.pitch_variation,
            volume: config.blip_volume,
        }
    }

    /// `index` is the character's position in the line, spaces included.
    pub fn should_blip(&self, index: usize, c: char) -> bool {
        if self.skip_spaces && c.is_whitespace() {
            return false;
        }
        if self.skip_punctuation && is_punctuation(c) {
            return false;
        }
        index % self.chars_per_blip.max(1) == 0
    }

    /// Line pitch plus a uniform variation in `[-pitch_variation, pitch_variation]`.
    pub fn pitch(&self, base: f32, rng: &mut impl Rng) -> f32 {
        if self.pitch_variation <= 0.0 {
            return base;
        }
        base + rng.gen_range(-self.pitch_variation..=self.pitch_variation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reveals_one_char_per_interval() {
        let mut tw = Typewriter::new("Hola", 0.1);
        assert_eq!(tw.tick(0.0), vec![(0, 'H')]);
        assert_eq!(tw.visible(), "H");
        assert!(tw.tick(0.05).is_empty());
        assert_eq!(tw.tick(0.05), vec![(1, 'o')]);
        assert_eq!(tw.tick(0.25).len(), 2);
        assert!(tw.is_done());
        assert!(tw.tick(1.0).is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let mut tw = Typewriter::new("¿Qué?", 0.25);
        tw.tick(0.5);
        assert_eq!(tw.visible(), "¿Qu");
        tw.finish();
        assert_eq!(tw.visible(), "¿Qué?");
    }

    #[test]
    fn test_zero_speed_reveals_everything() {
        let mut tw = Typewriter::new("abc", 0.0);
        assert_eq!(tw.tick(0.0).len(), 3);
        assert!(tw.is_done());
    }

    #[test]
    fn test_blip_rules() {
        let blips = BlipSettings::default();
        assert!(blips.should_blip(0, 'a'));
        assert!(!blips.should_blip(1, 'b'));
        assert!(!blips.should_blip(2, ' '));
        assert!(!blips.should_blip(4, '?'));
        assert!(!blips.should_blip(4, '¡'));

        let noisy = BlipSettings { skip_spaces: false, skip_punctuation: false, chars_per_blip: 1, ..blips };
        assert!(noisy.should_blip(3, ' '));
        assert!(noisy.should_blip(5, '!'));
    }

    #[test]
    fn test_pitch_stays_in_range() {
        let blips = BlipSettings { pitch_variation: 0.1, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let pitch = blips.pitch(1.2, &mut rng);
            assert!((1.09..=1.31).contains(&pitch));
        }
        let flat = BlipSettings { pitch_variation: 0.0, ..Default::default() };
        assert_eq!(flat.pitch(0.8, &mut rng), 0.8);
    }
}
