//! Repeating timers on a virtual
//! clock.
//!
//! The scheduler never sleeps. A driver
//! (a tokio loop, a browser interval, a
//! test) advances it to the elapsed
//! time and runs whatever jobs come
//! back.

use std::time::Duration;

const MIN_PERIOD: Duration =
  Duration::from_millis(1);

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<J> {
  handle:   TimerHandle,
  job:      J,
  period:   Duration,
  deadline: Duration,
  running:  bool
}

#[derive(Debug, Clone)]
pub struct Scheduler<J> {
  now:         Duration,
  next_handle: u64,
  timers:      Vec<Timer<J>>
}

impl<J> Default for Scheduler<J> {
  fn default() -> Self {
    Self {
      now:         Duration::ZERO,
      next_handle: 0,
      timers:      Vec::new()
    }
  }
}

impl<J> Scheduler<J>
where
  J: Clone
{
  pub fn new() -> Self {
    Self::default()
  }

  /// Time elapsed since the scheduler
  /// was created.
  pub fn now(&self) -> Duration {
    self.now
  }

  /// Registers a repeating job. With
  /// `immediate` the first run is due
  /// right away, otherwise one period
  /// from now.
  pub fn every(
    &mut self,
    job: J,
    period: Duration,
    immediate: bool
  ) -> TimerHandle {
    let period = period.max(MIN_PERIOD);
    let handle =
      TimerHandle(self.next_handle);
    self.next_handle += 1;
    let deadline = if immediate {
      self.now
    } else {
      self.now + period
    };
    self.timers.push(Timer {
      handle,
      job,
      period,
      deadline,
      running: true
    });
    handle
  }

  /// Returns `false` for a handle that
  /// was already stopped or unknown.
  pub fn stop(
    &mut self,
    handle: TimerHandle
  ) -> bool {
    match self
      .timers
      .iter_mut()
      .find(|timer| timer.handle == handle)
    {
      | Some(timer) if timer.running => {
        timer.running = false;
        true
      }
      | _ => false
    }
  }

  pub fn is_running(
    &self,
    handle: TimerHandle
  ) -> bool {
    self.timers.iter().any(|timer| {
      timer.handle == handle
        && timer.running
    })
  }

  pub fn next_deadline(
    &self
  ) -> Option<Duration> {
    self
      .timers
      .iter()
      .filter(|timer| timer.running)
      .map(|timer| timer.deadline)
      .min()
  }

  /// Moves the clock to `elapsed` and
  /// returns the jobs that came due, in
  /// deadline order.
  ///
  /// A timer fires at most once per
  /// call; periods missed while the
  /// driver was away are skipped.
  /// Moving backwards is ignored.
  pub fn advance_to(
    &mut self,
    elapsed: Duration
  ) -> Vec<J> {
    self.now = self.now.max(elapsed);
    let now = self.now;

    let mut due: Vec<&mut Timer<J>> = self
      .timers
      .iter_mut()
      .filter(|timer| {
        timer.running
          && timer.deadline <= now
      })
      .collect();
    due.sort_by_key(|timer| {
      (timer.deadline, timer.handle)
    });

    due
      .into_iter()
      .map(|timer| {
        while timer.deadline <= now {
          timer.deadline += timer.period;
        }
        timer.job.clone()
      })
      .collect()
  }

  pub fn advance_by(
    &mut self,
    delta: Duration
  ) -> Vec<J> {
    let target = self.now + delta;
    self.advance_to(target)
  }
}
