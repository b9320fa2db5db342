//! Background flea spawner
//!
//! One worker thread tracks two independent timers (normal and mutant) and
//! polls at a fine grain. Stopping is cooperative: the stop signal arrives
//! on a channel the worker waits on between polls, so it is seen at once.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::game::{SharedField, lock_field};
use crate::settings::Settings;
use crate::sim::FleaKind;

/// Spawner timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnerConfig {
    pub normal_every: Duration,
    pub mutant_every: Duration,
    pub poll: Duration,
}

impl SpawnerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            normal_every: settings.normal_spawn_interval(),
            mutant_every: settings.mutant_spawn_interval(),
            poll: settings.spawner_poll(),
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Handle to a running spawner; dropping it stops the worker
#[derive(Debug)]
pub struct Spawner {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spawner {
    /// Start the worker thread
    pub fn start(field: SharedField, config: SpawnerConfig) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("flea-spawner".into())
            .spawn(move || {
                let mut last_normal = Instant::now();
                let mut last_mutant = last_normal;

                // Any message or a dropped sender means stop
                while let Err(RecvTimeoutError::Timeout) = stop_rx.recv_timeout(config.poll) {
                    let now = Instant::now();

                    if now.duration_since(last_normal) >= config.normal_every {
                        lock_field(&field).try_spawn(FleaKind::Normal);
                        last_normal = now;
                    }

                    if now.duration_since(last_mutant) >= config.mutant_every {
                        lock_field(&field).try_spawn(FleaKind::Mutant);
                        last_mutant = now;
                    }
                }
                log::debug!("Spawner worker exiting");
            })?;

        log::info!(
            "Spawner started (normal every {:?}, mutant every {:?})",
            config.normal_every,
            config.mutant_every
        );

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Signal the worker and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // A send error means the worker is already gone
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Spawner worker panicked");
            } else {
                log::info!("Spawner stopped");
            }
        }
    }
}

impl Drop for Spawner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Field;
    use std::sync::{Arc, Mutex};

    fn fast_config() -> SpawnerConfig {
        SpawnerConfig {
            normal_every: Duration::from_millis(20),
            mutant_every: Duration::from_millis(40),
            poll: Duration::from_millis(5),
        }
    }

    fn shared_field() -> SharedField {
        Arc::new(Mutex::new(Field::new(800, 600, 11)))
    }

    #[test]
    fn test_default_config_timing() {
        let config = SpawnerConfig::default();
        assert_eq!(config.normal_every, Duration::from_millis(5_000));
        assert_eq!(config.mutant_every, Duration::from_millis(10_000));
        assert_eq!(config.poll, Duration::from_millis(100));
    }

    #[test]
    fn test_spawns_both_kinds_over_time() {
        let field = shared_field();
        let spawner = Spawner::start(field.clone(), fast_config()).unwrap();
        thread::sleep(Duration::from_millis(300));
        spawner.stop();

        let fleas = lock_field(&field).snapshot();
        assert!(fleas.iter().any(|f| f.kind == FleaKind::Normal));
        assert!(fleas.iter().any(|f| f.kind == FleaKind::Mutant));
    }

    #[test]
    fn test_nothing_spawns_before_first_interval() {
        let field = shared_field();
        let config = SpawnerConfig {
            normal_every: Duration::from_secs(60),
            mutant_every: Duration::from_secs(60),
            poll: Duration::from_millis(5),
        };
        let spawner = Spawner::start(field.clone(), config).unwrap();
        thread::sleep(Duration::from_millis(50));
        spawner.stop();
        assert_eq!(lock_field(&field).count(), 0);
    }

    #[test]
    fn test_stop_is_prompt_and_final() {
        let field = shared_field();
        let config = SpawnerConfig {
            poll: Duration::from_millis(100),
            ..fast_config()
        };
        let spawner = Spawner::start(field.clone(), config).unwrap();
        thread::sleep(Duration::from_millis(30));

        let started = Instant::now();
        spawner.stop();
        assert!(started.elapsed() < Duration::from_millis(100));

        let count = lock_field(&field).count();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(lock_field(&field).count(), count);
    }

    #[test]
    fn test_drop_stops_worker() {
        let field = shared_field();
        {
            let _spawner = Spawner::start(field.clone(), fast_config()).unwrap();
            thread::sleep(Duration::from_millis(30));
        }
        let count = lock_field(&field).count();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(lock_field(&field).count(), count);
    }
}
