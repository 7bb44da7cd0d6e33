// Headless demo of the controller loop: a ball bounces around a court, the
// network drives the paddle on the right wall, and whenever the ball is
// heading toward that wall the predicted impact point supplies the training
// target. This file is host scaffolding; the library under src/ is the
// actual deliverable.

use rand::Rng;
use tracing::info;

use online_ann::{Network, NetworkConfig};

// Training mode (training the network or just letting it play).
pub const TRAINING: bool = true;

// Court dimensions. The paddle rides the right wall.
pub const WIDTH: f64 = 20.0;
pub const HEIGHT: f64 = 10.0;
pub const PADDLE_HALF_HEIGHT: f64 = 0.9;
pub const PADDLE_MAX_SPEED: f64 = 0.25;
pub const BALL_SPEED: f64 = 0.3;

// Learning rate matching the original controller, which ran 6 sensors in,
// 1 velocity command out, one hidden layer of 4 neurons.
pub const LEARNING_RATE: f64 = 0.11;

// How long to run and how often to report.
pub const TICKS: usize = 200_000;
pub const REPORT_EVERY: usize = 20_000;

struct Ball {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Ball {
    fn serve<R: Rng>(rng: &mut R) -> Self {
        // Random direction, never too close to vertical.
        let angle: f64 = rng.gen_range(-1.0..1.0);
        let dir = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Ball {
            x: WIDTH / 2.0,
            y: HEIGHT / 2.0,
            vx: dir * BALL_SPEED * angle.cos(),
            vy: BALL_SPEED * angle.sin(),
        }
    }
}

// Where the ball will cross the paddle plane, folding the y co-ordinate back
// into the court at every top/bottom bounce. This closed form stands in for
// the ray cast the original game used against its back wall.
fn predict_impact_y(ball: &Ball) -> Option<f64> {
    if ball.vx <= 0.0 {
        return None;
    }
    let ticks = (WIDTH - ball.x) / ball.vx;
    let raw = ball.y + ball.vy * ticks;
    let period = 2.0 * HEIGHT;
    let folded = raw.rem_euclid(period);
    Some(if folded > HEIGHT { period - folded } else { folded })
}

fn main() {
    tracing_subscriber::fmt().init();

    let mut rng = rand::thread_rng();
    let config = NetworkConfig::new(6, 1, 1, 4, LEARNING_RATE);
    let mut brain = Network::new(config, &mut rng).expect("valid topology");

    let mut ball = Ball::serve(&mut rng);
    let mut paddle_y = HEIGHT / 2.0;
    let mut saved: u64 = 0;
    let mut missed: u64 = 0;

    for tick in 1..=TICKS {
        // Only command the paddle while the ball is actually coming at it,
        // as the original brain did when its ray cast hit the back wall.
        let yvel = match predict_impact_y(&ball) {
            Some(impact_y) => {
                let sensors = [ball.x, ball.y, ball.vx, ball.vy, WIDTH, paddle_y];
                let target = impact_y - paddle_y;
                let out = if TRAINING {
                    brain.train(&sensors, &[target])
                } else {
                    brain.evaluate(&sensors)
                };
                out.expect("sensor vector matches topology")[0]
            }
            None => 0.0,
        };

        // Clamping and integration are the host's job, not the network's.
        paddle_y = (paddle_y + yvel * PADDLE_MAX_SPEED)
            .clamp(PADDLE_HALF_HEIGHT, HEIGHT - PADDLE_HALF_HEIGHT);

        ball.x += ball.vx;
        ball.y += ball.vy;
        if ball.y < 0.0 {
            ball.y = -ball.y;
            ball.vy = -ball.vy;
        } else if ball.y > HEIGHT {
            ball.y = 2.0 * HEIGHT - ball.y;
            ball.vy = -ball.vy;
        }
        if ball.x < 0.0 {
            ball.x = -ball.x;
            ball.vx = -ball.vx;
        } else if ball.x >= WIDTH {
            if (ball.y - paddle_y).abs() <= PADDLE_HALF_HEIGHT {
                saved += 1;
                ball.x = WIDTH;
                ball.vx = -ball.vx;
            } else {
                missed += 1;
                ball = Ball::serve(&mut rng);
            }
        }

        if tick % REPORT_EVERY == 0 {
            let rallies = saved + missed;
            let save_rate = if rallies > 0 {
                saved as f64 / rallies as f64
            } else {
                0.0
            };
            info!(tick, saved, missed, save_rate, "training progress");
        }
    }

    info!(saved, missed, "run complete");
    info!(weights = %brain.export_weights(), "final weight vector");
}
