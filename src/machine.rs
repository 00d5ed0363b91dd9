// Seams to the emulated machine. The interpreter and the timer peripheral live
// outside the harness; the driver only needs to step them.

use crate::context::EmuContext;
use crate::framebuffer::Pixels;

pub trait Cpu {
    fn reset(&mut self, ctx: &mut EmuContext);
    /// Executes one instruction. LCD writes land in `lcd`.
    fn step(&mut self, ctx: &mut EmuContext, lcd: &mut Pixels<'_>);
}

pub trait Timers {
    /// Brings the timers up to `ctx.clock.next_event`.
    fn update(&mut self, ctx: &mut EmuContext);
}

/// Stand-in CPU for running the harness without an interpreter linked in:
/// each step jumps the tick counter straight to the deadline.
#[derive(Debug, Default)]
pub struct IdleCpu;

impl Cpu for IdleCpu {
    fn reset(&mut self, ctx: &mut EmuContext) {
        ctx.clock.total_ticks = 0;
    }

    fn step(&mut self, ctx: &mut EmuContext, _lcd: &mut Pixels<'_>) {
        ctx.clock.total_ticks = ctx.clock.next_event;
    }
}

/// Stand-in timer block that only tracks the last deadline it was driven to.
#[derive(Debug, Default)]
pub struct IdleTimers {
    last_deadline: u64,
}

impl IdleTimers {
    pub fn last_deadline(&self) -> u64 {
        self.last_deadline
    }
}

impl Timers for IdleTimers {
    fn update(&mut self, ctx: &mut EmuContext) {
        self.last_deadline = ctx.clock.next_event;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    #[test]
    fn test_idle_core_follows_deadline() {
        let mut ctx = EmuContext::with_capacity(16, 16);
        let mut fb = FrameBuffer::new(2, 2);
        let mut cpu = IdleCpu;
        let mut timers = IdleTimers::default();
        cpu.reset(&mut ctx);

        ctx.clock.next_event = 30;
        cpu.step(&mut ctx, &mut fb.begin_hardware_write().unwrap());
        timers.update(&mut ctx);
        assert_eq!(ctx.clock.total_ticks, 30);
        assert_eq!(timers.last_deadline(), 30);
    }
}
