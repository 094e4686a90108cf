// walls_bot/bot/src/concurrent/event_queue.rs
use crate::core::types::{BotEvent, EventPriority};
use crossbeam_queue::SegQueue;

// Lock-free event queue with priority
pub struct PriorityEventQueue {
    high_priority: SegQueue<BotEvent>,
    normal_priority: SegQueue<BotEvent>,
}

impl PriorityEventQueue {
    pub fn new() -> Self {
        PriorityEventQueue {
            high_priority: SegQueue::new(),
            normal_priority: SegQueue::new(),
        }
    }

    /// Queues an event at its own priority.
    pub fn push(&self, event: BotEvent) {
        match event.priority() {
            EventPriority::High => self.high_priority.push(event),
            EventPriority::Normal => self.normal_priority.push(event),
        }
    }

    pub fn pop(&self) -> Option<BotEvent> {
        self.high_priority.pop().or_else(|| self.normal_priority.pop())
    }

    /// Pops everything currently queued, highest priority first.
    pub fn drain(&self) -> Vec<BotEvent> {
        let mut batch = Vec::with_capacity(self.len());
        while let Some(event) = self.pop() {
            batch.push(event);
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.high_priority.is_empty() && self.normal_priority.is_empty()
    }

    pub fn len(&self) -> usize {
        self.high_priority.len() + self.normal_priority.len()
    }
}

impl Default for PriorityEventQueue {
    fn default() -> Self {
        Self::new()
    }
}
