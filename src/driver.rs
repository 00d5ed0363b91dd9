// Frame loop: input, then a fixed CPU/timer batch, then presentation.

use log::{info, trace};

use crate::context::EmuContext;
use crate::display::{FrameSink, Surface};
use crate::error::PresentError;
use crate::gpio::Gpio;
use crate::input::{EventSource, HostEvent, InputBridge};
use crate::machine::{Cpu, Timers};

/// How much emulated time one frame covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionBudget {
    /// CPU steps (and timer updates) per frame.
    pub batch_size: u32,
    /// Deadline advance per CPU step, in core cycles.
    pub tick_quantum: u64,
}

impl ExecutionBudget {
    pub fn ticks_per_frame(&self) -> u64 {
        self.batch_size as u64 * self.tick_quantum
    }
}

impl Default for ExecutionBudget {
    fn default() -> Self {
        ExecutionBudget {
            batch_size: 100_000,
            tick_quantum: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct ExecutionDriver<C, T, G> {
    cpu: C,
    timers: T,
    gpio: G,
    bridge: InputBridge,
    budget: ExecutionBudget,
    frames: u64,
}

impl<C: Cpu, T: Timers, G: Gpio> ExecutionDriver<C, T, G> {
    pub fn new(cpu: C, timers: T, gpio: G, budget: ExecutionBudget) -> Self {
        ExecutionDriver {
            cpu,
            timers,
            gpio,
            bridge: InputBridge::new(),
            budget,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Zeroes the deadline and resets the CPU. Call once before the first frame.
    pub fn reset(&mut self, ctx: &mut EmuContext) {
        ctx.clock.next_event = 0;
        self.cpu.reset(ctx);
        self.frames = 0;
    }

    /// Runs one frame. Returns `Quit` as soon as a quit event is seen; the
    /// rest of the frame is skipped in that case.
    pub fn run_frame<E, S>(
        &mut self,
        ctx: &mut EmuContext,
        events: &mut E,
        sink: &mut FrameSink<S>,
    ) -> Result<FrameOutcome, PresentError>
    where
        E: EventSource + ?Sized,
        S: Surface,
    {
        while let Some(event) = events.poll_event() {
            match event {
                HostEvent::Quit => return Ok(FrameOutcome::Quit),
                HostEvent::Key { key, pressed } => {
                    self.bridge.on_key_transition(key, pressed, &mut self.gpio)
                }
                HostEvent::Other => {}
            }
        }
        self.gpio.update();

        {
            let mut lcd = sink.begin_hardware_write()?;
            for _ in 0..self.budget.batch_size {
                ctx.clock.next_event += self.budget.tick_quantum;
                self.cpu.step(ctx, &mut lcd);
                self.timers.update(ctx);
            }
        }

        sink.present()?;
        self.frames += 1;
        trace!(
            "frame {} done, next_event={} total_ticks={}",
            self.frames, ctx.clock.next_event, ctx.clock.total_ticks
        );
        Ok(FrameOutcome::Continue)
    }

    /// Runs frames until the host asks to quit.
    pub fn run<E, S>(
        &mut self,
        ctx: &mut EmuContext,
        events: &mut E,
        sink: &mut FrameSink<S>,
    ) -> Result<(), PresentError>
    where
        E: EventSource + ?Sized,
        S: Surface,
    {
        loop {
            if self.run_frame(ctx, events, sink)? == FrameOutcome::Quit {
                info!("quit requested after {} frames", self.frames);
                return Ok(());
            }
        }
    }
}
