use super::event::{EventKind, EventQueue};
use super::factory::ProcessFactory;
use std::collections::VecDeque;

// Index into the process table
pub type ProcessId = usize;
pub type Time = f64;

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: Time,
    pub service_time: Time,
    pub remaining_burst: Time,
    pub completion_time: Option<Time>,
    pub last_time_on_cpu: Option<Time>,
    // Time from arrival to the most recent assignment
    pub wait_time: Time,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: Time, service_time: Time) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            remaining_burst: service_time,
            completion_time: None,
            last_time_on_cpu: None,
            wait_time: 0.0,
        }
    }

    /// `(waited + service) / service`, with `waited` measured from arrival to `now`.
    pub fn response_ratio(&self, now: Time) -> f64 {
        if self.service_time <= 0.0 {
            return f64::INFINITY;
        }
        (now - self.arrival_time + self.service_time) / self.service_time
    }

    pub fn turnaround(&self) -> Option<Time> {
        self.completion_time.map(|done| done - self.arrival_time)
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }
}

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo { procs: VecDeque<ProcessId> },
    // Unordered; the highest response ratio is found at selection time
    ResponseRatio { procs: Vec<ProcessId> },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_response_ratio() -> Self {
        Self::ResponseRatio { procs: Vec::new() }
    }

    pub fn push(&mut self, pid: ProcessId) {
        match self {
            Self::Fifo { procs } => procs.push_back(pid),
            Self::ResponseRatio { procs } => procs.push(pid),
        }
    }

    pub fn pop(&mut self, processes: &[Process], now: Time) -> Option<ProcessId> {
        match self {
            Self::Fifo { procs } => procs.pop_front(),
            Self::ResponseRatio { procs } => {
                let index = highest_response_ratio(procs, processes, now)?;
                Some(procs.swap_remove(index))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::ResponseRatio { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&pid),
            Self::ResponseRatio { procs } => procs.contains(&pid),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = ProcessId> + '_> {
        match self {
            Self::Fifo { procs } => Box::new(procs.iter().copied()),
            Self::ResponseRatio { procs } => Box::new(procs.iter().copied()),
        }
    }
}

/// Position in `candidates` of the process with the highest response ratio at `now`.
/// Ties go to the earliest arrival, then the lowest id.
pub fn highest_response_ratio(
    candidates: &[ProcessId],
    processes: &[Process],
    now: Time,
) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .max_by(|&(_, &a), &(_, &b)| {
            let (a, b) = (&processes[a], &processes[b]);
            a.response_ratio(now)
                .total_cmp(&b.response_ratio(now))
                .then_with(|| b.arrival_time.total_cmp(&a.arrival_time))
                .then_with(|| b.id.cmp(&a.id))
        })
        .map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReason {
    Arrival,
    Departure,
    Timeout,
}

/// One change of CPU ownership. `ready_len` is the ready-queue length right after the switch.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSwitch {
    pub time: Time,
    pub from: Option<ProcessId>,
    pub to: Option<ProcessId>,
    // Remaining burst of `to` when it took the CPU
    pub granted: Option<Time>,
    pub reason: SwitchReason,
    pub ready_len: usize,
}

#[derive(Debug)]
pub struct RunState {
    pub now: Time,
    pub on_cpu: Option<ProcessId>,
    pub ready: ReadyQueue,
    pub events: EventQueue,
    pub processes: Vec<Process>,
    pub switches: Vec<CpuSwitch>,

    pub idle_time: Time,
    pub busy_time: Time,
    pub ready_queue_samples: u64,
    pub completed: usize,
    pub query_interval: Time,

    factory: ProcessFactory,
    // Start of the current idle interval, None while a process holds the CPU
    idle_since: Option<Time>,
    // Process that last gave up the CPU, pending the next recorded switch
    outgoing: Option<ProcessId>,
}

impl RunState {
    pub fn new(factory: ProcessFactory, ready: ReadyQueue, query_interval: Time) -> Self {
        Self {
            now: 0.0,
            on_cpu: None,
            ready,
            events: EventQueue::new(),
            processes: Vec::new(),
            switches: Vec::new(),
            idle_time: 0.0,
            busy_time: 0.0,
            ready_queue_samples: 0,
            completed: 0,
            query_interval,
            factory,
            idle_since: Some(0.0),
            outgoing: None,
        }
    }

    pub fn advance_to(&mut self, time: Time) {
        debug_assert!(
            time >= self.now,
            "Clock moving backwards: {} -> {time}",
            self.now
        );
        self.now = time;
    }

    pub fn process(&self, pid: ProcessId) -> &Process {
        &self.processes[pid]
    }

    pub fn process_mut(&mut self, pid: ProcessId) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.on_cpu.is_none()
    }

    /// Creates process 0 and schedules its arrival at the current time.
    pub fn spawn_seed(&mut self) -> ProcessId {
        let process = self.factory.seed(self.now);
        self.admit(process)
    }

    /// Creates the next process in the arrival stream and schedules its arrival.
    pub fn spawn_next_arrival(&mut self) -> ProcessId {
        let process = self.factory.next_arrival(self.now);
        self.admit(process)
    }

    fn admit(&mut self, process: Process) -> ProcessId {
        let pid = process.id;
        let arrival_time = process.arrival_time;
        debug_assert_eq!(self.processes.len(), pid, "ProcessId must match Vec index");
        self.processes.push(process);

        if arrival_time.is_finite() {
            self.events
                .schedule(arrival_time, Some(pid), EventKind::Arrival);
        } else {
            tracing::warn!(pid, "non-finite arrival time, arrival stream ends");
        }
        pid
    }

    /// Gives the CPU to `pid` and schedules its departure after the remaining burst.
    pub fn assign(&mut self, pid: ProcessId, reason: SwitchReason) {
        debug_assert!(
            self.on_cpu.is_none(),
            "CPU already running process {:?}",
            self.on_cpu
        );
        debug_assert!(!self.ready.contains(pid), "Assigned process {pid} still queued");

        if let Some(start) = self.idle_since.take() {
            self.idle_time += self.now - start;
        }

        let now = self.now;
        let process = self.process_mut(pid);
        process.last_time_on_cpu = Some(now);
        process.wait_time = now - process.arrival_time;
        let granted = process.remaining_burst;
        let departs_at = now + granted;

        self.on_cpu = Some(pid);
        self.events
            .schedule(departs_at, Some(pid), EventKind::Departure);
        self.record_switch(Some(pid), Some(granted), reason);
    }

    /// Finalizes the process on the CPU at the current time and frees the CPU.
    pub fn complete(&mut self, pid: ProcessId) {
        debug_assert_eq!(self.on_cpu, Some(pid), "Departing process {pid} not on CPU");

        let now = self.now;
        let process = self.process_mut(pid);
        let started = process.last_time_on_cpu.unwrap_or(now);
        process.completion_time = Some(now);
        process.remaining_burst = 0.0;

        self.busy_time += now - started;
        self.completed += 1;
        self.on_cpu = None;
        self.outgoing = Some(pid);
    }

    /// Takes the CPU away from its current process, charging it for the time run so far and
    /// invalidating its pending departure.
    pub fn preempt(&mut self) -> Option<ProcessId> {
        let pid = self.on_cpu.take()?;

        let now = self.now;
        let process = self.process_mut(pid);
        let elapsed = now - process.last_time_on_cpu.unwrap_or(now);
        process.remaining_burst = (process.remaining_burst - elapsed).max(0.0);

        self.busy_time += elapsed;
        self.events.cancel(pid, EventKind::Departure);
        self.outgoing = Some(pid);
        Some(pid)
    }

    /// Leaves the CPU idle from the current time on.
    pub fn go_idle(&mut self) {
        debug_assert!(self.on_cpu.is_none(), "Idling a busy CPU");
        self.idle_since = Some(self.now);
        self.record_switch(None, None, SwitchReason::Departure);
    }

    /// Closes whichever CPU interval is still open so that idle + busy covers the clock.
    pub fn close_intervals(&mut self) {
        match self.on_cpu {
            None => {
                if let Some(start) = self.idle_since.replace(self.now) {
                    self.idle_time += self.now - start;
                }
            }
            Some(pid) => {
                let started = self.process(pid).last_time_on_cpu.unwrap_or(self.now);
                self.busy_time += self.now - started;
            }
        }
    }

    pub fn ready_push(&mut self, pid: ProcessId) {
        tracing::trace!(pid, len = self.ready.len() + 1, "ready queue push");
        self.ready.push(pid);
    }

    pub fn ready_pop(&mut self) -> Option<ProcessId> {
        self.ready.pop(&self.processes, self.now)
    }

    pub fn sample_ready_queue(&mut self) {
        self.ready_queue_samples += self.ready.len() as u64;
    }

    fn record_switch(
        &mut self,
        to: Option<ProcessId>,
        granted: Option<Time>,
        reason: SwitchReason,
    ) {
        let from = self.outgoing.take();
        tracing::debug!(time = self.now, ?from, ?to, ?reason, "cpu switch");
        self.switches.push(CpuSwitch {
            time: self.now,
            from,
            to,
            granted,
            reason,
            ready_len: self.ready.len(),
        });
    }
}
