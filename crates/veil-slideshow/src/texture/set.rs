use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, TryRecvError};

use veil_engine::coords::Vec2;
use veil_engine::scene::TextureData;

use super::{ImageLoader, LoadError, LoadResult, LoadTicket};

/// One decoded image of a completed set.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: PathBuf,
    pub data: TextureData,
    /// Normalized sampling center.
    pub center: Vec2,
}

/// Barrier over N independent image loads.
///
/// Slots are assigned in request order, so the completed images always come
/// back in the order of `sources` no matter which load finishes first.
#[derive(Debug)]
pub struct TextureSet {
    sources: Vec<PathBuf>,
    slots: Vec<Option<TextureData>>,
    loaded: usize,
    rx: Receiver<(usize, LoadResult)>,
    started: Instant,
    timeout: Option<Duration>,
    finished: bool,
}

impl TextureSet {
    /// Requests every source from `loader`.
    pub fn load(sources: &[PathBuf], loader: &dyn ImageLoader) -> Self {
        let (tx, rx) = unbounded();

        for (slot, source) in sources.iter().enumerate() {
            loader.load(source, LoadTicket::new(slot, tx.clone()));
        }
        // Only tickets hold senders from here on; all of them gone means no
        // more results can arrive.
        drop(tx);

        Self {
            sources: sources.to_vec(),
            slots: vec![None; sources.len()],
            loaded: 0,
            rx,
            started: Instant::now(),
            timeout: None,
            finished: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of images received so far.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// `true` once `poll` has reported the outcome.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drains completed loads. Returns the outcome exactly once: the images
    /// in source order after the last one arrives, or the first error.
    pub fn poll(&mut self, now: Instant) -> Option<Result<Vec<LoadedImage>, LoadError>> {
        if self.finished {
            return None;
        }

        loop {
            match self.rx.try_recv() {
                Ok((slot, Ok(data))) => self.store(slot, data),
                Ok((slot, Err(err))) => {
                    log::debug!("texture slot {slot} failed: {err}");
                    return self.finish(Err(err));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.loaded < self.len() {
                        let pending = self.len() - self.loaded;
                        return self.finish(Err(LoadError::Disconnected { pending }));
                    }
                    break;
                }
            }
        }

        if self.loaded == self.len() {
            let images = self.take_images();
            return self.finish(Ok(images));
        }

        if let Some(timeout) = self.timeout {
            if now.saturating_duration_since(self.started) >= timeout {
                return self.finish(Err(LoadError::TimedOut(timeout)));
            }
        }

        None
    }

    fn store(&mut self, slot: usize, data: TextureData) {
        let Some(entry) = self.slots.get_mut(slot) else {
            log::warn!("texture slot {slot} out of range");
            return;
        };
        if entry.is_some() {
            log::warn!("texture slot {slot} completed twice; keeping the first");
            return;
        }
        *entry = Some(data);
        self.loaded += 1;
    }

    fn take_images(&mut self) -> Vec<LoadedImage> {
        self.sources
            .iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(source, slot)| {
                slot.take().map(|data| LoadedImage {
                    source: source.clone(),
                    data,
                    center: Vec2::new(0.5, 0.5),
                })
            })
            .collect()
    }

    fn finish(
        &mut self,
        outcome: Result<Vec<LoadedImage>, LoadError>,
    ) -> Option<Result<Vec<LoadedImage>, LoadError>> {
        self.finished = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::ManualLoader;

    fn sources() -> Vec<PathBuf> {
        vec!["primary.jpg".into(), "hover.jpg".into(), "mask.jpg".into()]
    }

    fn tex(w: u32) -> LoadResult {
        Ok(TextureData::solid(w, 1, [0, 0, 0, 255]))
    }

    #[test]
    fn completes_in_issue_order_regardless_of_arrival() {
        let loader = ManualLoader::new();
        let mut set = TextureSet::load(&sources(), &loader);
        let now = set.started();

        assert!(loader.complete("mask.jpg", tex(3)));
        assert!(set.poll(now).is_none());
        assert!(loader.complete("primary.jpg", tex(1)));
        assert!(set.poll(now).is_none());
        assert_eq!(set.loaded(), 2);
        assert!(loader.complete("hover.jpg", tex(2)));

        let images = set.poll(now).unwrap().unwrap();
        let widths: Vec<u32> = images.iter().map(|i| i.data.width).collect();
        assert_eq!(widths, vec![1, 2, 3]);
        assert_eq!(images[0].source, PathBuf::from("primary.jpg"));
        assert!(images.iter().all(|i| i.center == Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn reports_completion_exactly_once() {
        let loader = ManualLoader::new();
        let mut set = TextureSet::load(&sources(), &loader);
        let now = set.started();
        loader.complete_all((4, 4));

        assert!(matches!(set.poll(now), Some(Ok(_))));
        assert!(set.poll(now).is_none());
        assert!(set.is_finished());
    }

    #[test]
    fn first_failure_finishes_the_set() {
        let loader = ManualLoader::new();
        let mut set = TextureSet::load(&sources(), &loader);
        let now = set.started();

        loader.complete(
            "hover.jpg",
            Err(LoadError::Decode { path: "hover.jpg".into(), message: "bad".into() }),
        );
        assert!(matches!(set.poll(now), Some(Err(LoadError::Decode { .. }))));

        loader.complete_all((1, 1));
        assert!(set.poll(now).is_none());
    }

    #[test]
    fn dropped_requests_report_disconnect() {
        let loader = ManualLoader::new();
        let mut set = TextureSet::load(&sources(), &loader);
        let now = set.started();

        loader.complete("primary.jpg", tex(1));
        loader.abandon_all();

        assert!(matches!(
            set.poll(now),
            Some(Err(LoadError::Disconnected { pending: 2 }))
        ));
    }

    #[test]
    fn times_out_when_configured() {
        let loader = ManualLoader::new();
        let timeout = Duration::from_secs(2);
        let mut set = TextureSet::load(&sources(), &loader).with_timeout(Some(timeout));
        let t0 = set.started();

        assert!(set.poll(t0 + Duration::from_secs(1)).is_none());
        assert!(matches!(
            set.poll(t0 + Duration::from_secs(3)),
            Some(Err(LoadError::TimedOut(d))) if d == timeout
        ));
        assert_eq!(loader.pending(), 3);
    }

    #[test]
    fn empty_set_completes_immediately() {
        let loader = ManualLoader::new();
        let mut set = TextureSet::load(&[], &loader);
        assert!(matches!(set.poll(Instant::now()), Some(Ok(v)) if v.is_empty()));
    }
}
