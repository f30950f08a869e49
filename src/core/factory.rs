use super::state::{Process, ProcessId, Time};

/// Source of exponentially distributed samples.
pub trait Sampler {
    /// One draw from an exponential distribution with the given `rate` (mean `1 / rate`).
    fn exponential(&mut self, rate: f64) -> f64;
}

impl<T: Sampler + ?Sized> Sampler for Box<T> {
    fn exponential(&mut self, rate: f64) -> f64 {
        (**self).exponential(rate)
    }
}

pub struct ProcessFactory {
    sampler: Box<dyn Sampler>,
    arrival_rate: f64,
    service_rate: f64,
    next_id: ProcessId,
}

impl ProcessFactory {
    pub fn new(sampler: Box<dyn Sampler>, arrival_rate: f64, mean_service_time: f64) -> Self {
        Self {
            sampler,
            arrival_rate,
            service_rate: 1.0 / mean_service_time,
            next_id: 0,
        }
    }

    /// The first process of a run, arriving exactly at `now`.
    pub fn seed(&mut self, now: Time) -> Process {
        let service_time = self.sampler.exponential(self.service_rate);
        self.create(now, service_time)
    }

    /// The next process in the arrival stream, one exponential inter-arrival gap after `now`.
    pub fn next_arrival(&mut self, now: Time) -> Process {
        let arrival_time = now + self.sampler.exponential(self.arrival_rate);
        let service_time = self.sampler.exponential(self.service_rate);
        self.create(arrival_time, service_time)
    }

    pub fn created(&self) -> usize {
        self.next_id
    }

    fn create(&mut self, arrival_time: Time, service_time: Time) -> Process {
        let id = self.next_id;
        self.next_id += 1;
        Process::new(id, arrival_time, service_time)
    }
}

impl std::fmt::Debug for ProcessFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessFactory")
            .field("arrival_rate", &self.arrival_rate)
            .field("service_rate", &self.service_rate)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
