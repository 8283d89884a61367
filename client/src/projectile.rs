//! Fixed-size projectile pool.
//!
//! Slots are recycled rather than allocated. Each activation bumps the slot's
//! generation, so a delayed expiry aimed at an earlier shot cannot retire the
//! shot that currently occupies the slot.

use glam::Vec3;

pub const POOL_SIZE: usize = 20;
pub const PROJECTILE_SPEED: f32 = 10.0;
/// Fraction of velocity applied per tick
pub const STEP_FACTOR: f32 = 0.1;
/// Seconds a projectile lives before it is retired
pub const PROJECTILE_TTL: f64 = 2.0;

/// Who fired a projectile. A shooter is never hit by its own shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    LocalActor,
    Enemy(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub active: bool,
    pub owner: Owner,
    pub position: Vec3,
    pub velocity: Vec3,
    generation: u32,
}

impl Projectile {
    fn idle() -> Self {
        Self {
            active: false,
            owner: Owner::LocalActor,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            generation: 0,
        }
    }
}

/// Identifies one activation of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    pub index: usize,
    pub generation: u32,
}

#[derive(Debug, Clone)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(POOL_SIZE)
    }
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Projectile::idle(); capacity],
        }
    }

    /// Activates the first free slot. Returns `None` when every slot is in
    /// flight; the shot is dropped.
    pub fn fire(&mut self, owner: Owner, position: Vec3, velocity: Vec3) -> Option<SlotHandle> {
        let (index, slot) = self.slots.iter_mut().enumerate().find(|(_, p)| !p.active)?;

        slot.active = true;
        slot.owner = owner;
        slot.position = position;
        slot.velocity = velocity;
        slot.generation = slot.generation.wrapping_add(1);

        Some(SlotHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Retires the shot `handle` refers to, if it is still in flight.
    pub fn expire(&mut self, handle: SlotHandle) -> bool {
        match self.slots.get_mut(handle.index) {
            Some(slot) if slot.active && slot.generation == handle.generation => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn deactivate(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.active = false;
        }
    }

    /// Moves every active projectile one tick along its velocity.
    pub fn integrate(&mut self) {
        for slot in self.slots.iter_mut().filter(|p| p.active) {
            slot.position += slot.velocity * STEP_FACTOR;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Projectile> {
        self.slots.get(index)
    }

    pub fn active(&self) -> impl Iterator<Item = (usize, &Projectile)> {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_is_bounded() {
        let mut pool = ProjectilePool::default();
        for _ in 0..POOL_SIZE {
            assert!(pool.fire(Owner::LocalActor, Vec3::ZERO, Vec3::Z).is_some());
        }
        assert_eq!(pool.active_count(), POOL_SIZE);
        assert!(pool.fire(Owner::LocalActor, Vec3::ZERO, Vec3::Z).is_none());
        assert_eq!(pool.active_count(), POOL_SIZE);
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut pool = ProjectilePool::new(1);
        let first = pool.fire(Owner::LocalActor, Vec3::ZERO, Vec3::Z).unwrap();
        pool.deactivate(first.index);

        let second = pool.fire(Owner::Enemy(3), Vec3::ZERO, Vec3::X).unwrap();
        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);

        assert!(!pool.expire(first));
        assert_eq!(pool.active_count(), 1);
        assert!(pool.expire(second));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_integrate() {
        let mut pool = ProjectilePool::new(2);
        let handle = pool
            .fire(Owner::LocalActor, Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, PROJECTILE_SPEED))
            .unwrap();
        pool.integrate();
        pool.integrate();

        let projectile = pool.get(handle.index).unwrap();
        assert_eq!(projectile.position, Vec3::new(0.0, 1.5, 2.0));
        assert_eq!(pool.active().count(), 1);
    }
}
