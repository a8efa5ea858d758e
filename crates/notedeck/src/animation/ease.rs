#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    OutCubic,
    InOutCubic,
    OutQuart,
    /// Overshoots slightly before settling; used for popping elements in.
    OutBack,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::OutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::OutQuart,
        Ease::OutBack,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_eq!(ease.apply(-3.0), ease.apply(0.0));
            assert_eq!(ease.apply(7.0), ease.apply(1.0));
        }
    }

    #[test]
    fn out_quart_matches_formula() {
        for i in 0..=10 {
            let p = i as f64 / 10.0;
            assert!((Ease::OutQuart.apply(p) - (1.0 - (1.0 - p).powi(4))).abs() < 1e-12);
        }
    }

    #[test]
    fn out_back_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::OutBack.apply(i as f64 / 100.0))
            .fold(0.0_f64, f64::max);
        assert!(peak > 1.0);
    }
}
