//! Cosmetic background: clouds and stars drifting left and wrapping around

use rand::Rng;

use crate::config::GameConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
}

/// Base drift of every star per step at speed 1.0
const STAR_DRIFT: f32 = 0.2;
/// Fraction of the speed multiplier applied to clouds
const CLOUD_PARALLAX: f32 = 0.5;
/// Fraction of the speed multiplier applied to stars
const STAR_PARALLAX: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct Background {
    pub clouds: Vec<Cloud>,
    pub stars: Vec<Star>,
    width: f32,
    sky_height: f32,
}

impl Background {
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let width = config.canvas_width;
        let sky_height = config.canvas_height / 2.0;

        let clouds = (0..config.cloud_count)
            .map(|_| Cloud {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * sky_height,
                width: 60.0 + rng.gen::<f32>() * 60.0,
                height: 30.0 + rng.gen::<f32>() * 20.0,
                speed: 0.5 + rng.gen::<f32>(),
            })
            .collect();

        let stars = (0..config.star_count)
            .map(|_| Star {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * sky_height,
                size: 1.0 + rng.gen::<f32>() * 2.0,
                brightness: 0.5 + rng.gen::<f32>() * 0.5,
            })
            .collect();

        Self {
            clouds,
            stars,
            width,
            sky_height,
        }
    }

    /// Drift everything left, scaled by a fraction of the speed multiplier
    pub fn advance<R: Rng>(&mut self, speed: f64, rng: &mut R) {
        let speed = speed as f32;

        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed * speed * CLOUD_PARALLAX;
            if cloud.x + cloud.width < 0.0 {
                cloud.x = self.width;
                cloud.y = rng.gen::<f32>() * self.sky_height;
            }
        }

        for star in &mut self.stars {
            star.x -= STAR_DRIFT * speed * STAR_PARALLAX;
            if star.x < 0.0 {
                star.x = self.width;
                star.y = rng.gen::<f32>() * self.sky_height;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_population_stays_in_sky() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = GameConfig::default();
        let bg = Background::new(&config, &mut rng);
        assert_eq!(bg.clouds.len(), 5);
        assert_eq!(bg.stars.len(), 30);
        assert!(bg.stars.iter().all(|s| s.y <= 200.0 && s.size >= 1.0 && s.size <= 3.0));
        assert!(bg.clouds.iter().all(|c| c.speed >= 0.5 && c.speed <= 1.5));
    }

    #[test]
    fn test_clouds_wrap_to_right_edge() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = GameConfig::default();
        let mut bg = Background::new(&config, &mut rng);
        bg.clouds[0] = Cloud { x: -59.5, y: 10.0, width: 60.0, height: 30.0, speed: 1.0 };
        bg.advance(2.0, &mut rng);
        assert_eq!(bg.clouds[0].x, 800.0);
        assert!(bg.clouds[0].y <= 200.0);
    }

    #[test]
    fn test_stars_drift_slower_than_clouds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = GameConfig::default();
        let mut bg = Background::new(&config, &mut rng);
        bg.clouds[0] = Cloud { x: 400.0, y: 10.0, width: 60.0, height: 30.0, speed: 0.5 };
        bg.stars[0] = Star { x: 400.0, y: 10.0, size: 1.0, brightness: 1.0 };
        bg.advance(1.0, &mut rng);
        assert_eq!(bg.clouds[0].x, 400.0 - 0.25);
        assert!((bg.stars[0].x - (400.0 - 0.06)).abs() < 1e-4);
    }
}
