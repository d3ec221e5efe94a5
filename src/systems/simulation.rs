//! Game simulation system
//!
//! Runs the fixed-timestep loop for one survivor and one killer:
//! - Scripted input → actor velocity
//! - Capsule movement through the collision world
//! - Chase volume tracking
//! - Sight and trigger queries

use std::collections::HashSet;

use fogbound_math::Vec3;
use fogbound_physics::{
    EntityId, MoveResult, PhysicsWorld, TriggerCastHit, TriggerHit, TriggerKind, TriggerVolume, WorldLayout,
};

use crate::actor::{Actor, ActorRole};
use crate::config::{ActorConfig, AppConfig};
use crate::input::{MoveIntent, Waypoint, WaypointScript};

/// How far ahead of the survivor's eyes interaction prompts are searched
const INTERACTION_REACH: f32 = 2.0;

/// Radius of the interaction sweep
const INTERACTION_SWEEP_RADIUS: f32 = 0.3;

/// What happened during one tick
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    pub survivor: MoveResult,
    pub killer: MoveResult,
    /// Killer had line of sight to the survivor at the end of the tick
    pub killer_sees_survivor: bool,
    /// Survivor is inside the killer's chase volume
    pub in_chase: bool,
    /// Survivor overlaps a vault trigger
    pub vault_available: bool,
    /// Nearest interaction trigger in front of the survivor
    pub interaction_target: Option<EntityId>,
}

/// Running totals over a simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub ticks: u64,
    /// Horizontal distance walked by the survivor
    pub survivor_distance: f32,
    pub step_ups: u32,
    pub chase_ticks: u64,
    pub sighted_ticks: u64,
    pub vault_ticks: u64,
    pub max_penetration: f32,
}

/// Manages the simulation loop
///
/// Owns the collision world; geometry changes go through [`SimulationSystem::rebuild`].
pub struct SimulationSystem {
    world: PhysicsWorld,
    survivor: Actor,
    killer: Actor,
    survivor_script: WaypointScript,
    actor_config: ActorConfig,
    dt: f32,
    tick_rate: u64,
    tick: u64,
    last_seen: Option<Vec3>,
    stats: SimulationStats,
    trigger_scratch: Vec<TriggerHit>,
    cast_scratch: Vec<TriggerCastHit>,
}

impl SimulationSystem {
    /// Create a simulation over `layout`
    ///
    /// Actors are placed at the layout's "survivor" and "killer" spawns
    /// (origin when missing) after probing for free space.
    pub fn new(config: &AppConfig, layout: &WorldLayout) -> Self {
        let mut world = PhysicsWorld::with_config(config.physics.to_physics_config());
        world.rebuild_from_layout(layout);

        let actor_config = config.actor.clone();
        let [survivor_entity, killer_entity] = free_entities(layout);

        let survivor = spawn_actor(&world, layout, survivor_entity, ActorRole::Survivor, &actor_config);
        let killer = spawn_actor(&world, layout, killer_entity, ActorRole::Killer, &actor_config);

        let mut system = Self {
            world,
            survivor_script: patrol_around(survivor.position),
            survivor,
            killer,
            actor_config,
            dt: config.simulation.dt(),
            tick_rate: u64::from(config.simulation.tick_rate.max(1)),
            tick: 0,
            last_seen: None,
            stats: SimulationStats::default(),
            trigger_scratch: Vec::new(),
            cast_scratch: Vec::new(),
        };
        system.add_chase_volume();

        log::info!(
            "Simulation ready on '{}': survivor {} at {:?}, killer {} at {:?}",
            layout.name,
            system.survivor.entity,
            system.survivor.position,
            system.killer.entity,
            system.killer.position
        );

        system
    }

    /// Replace the world geometry, keeping the actors where they are
    pub fn rebuild(&mut self, layout: &WorldLayout) {
        self.world.rebuild_from_layout(layout);
        self.add_chase_volume();
    }

    fn add_chase_volume(&mut self) {
        let extent = self.actor_config.chase_radius;
        self.world.add_trigger(TriggerVolume::new(
            self.killer.entity,
            self.killer.position,
            Vec3::new(extent, self.actor_config.height, extent),
            TriggerKind::Chase,
        ));
    }

    /// Run one fixed tick
    pub fn update(&mut self) -> TickReport {
        self.tick += 1;

        // 1. Survivor follows its route
        let intent = self.survivor_script.next_intent(self.survivor.position);
        self.survivor.apply_movement(intent.velocity(self.actor_config.walk_speed));
        if intent.jump {
            self.survivor.jump();
        }

        // 2. Killer chases what it can see, else the last sighting
        let chase_target = if self.killer_sees_survivor() {
            self.last_seen = Some(self.survivor.position);
            Some(self.survivor.position)
        } else {
            self.last_seen
        };
        let killer_intent = chase_target
            .map(|target| MoveIntent::toward(self.killer.position, target))
            .unwrap_or(MoveIntent::IDLE);
        self.killer.apply_movement(killer_intent.velocity(self.actor_config.killer_speed));

        // 3. Move both through the world
        let survivor_start = self.survivor.position;
        let gravity = self.actor_config.gravity;
        let survivor = self.survivor.step(&self.world, self.dt, gravity);
        let killer = self.killer.step(&self.world, self.dt, gravity);

        // 4. The chase volume follows the killer
        if !self.world.update_trigger_center(self.killer.entity, self.killer.position) {
            log::warn!("Chase volume for {} missing, re-adding", self.killer.entity);
            self.add_chase_volume();
        }

        // 5. Queries for this tick
        let killer_sees_survivor = self.killer_sees_survivor();

        self.world.query_capsule_triggers_into(
            &mut self.trigger_scratch,
            self.survivor.position,
            self.survivor.capsule,
            TriggerKind::Chase,
        );
        let in_chase = !self.trigger_scratch.is_empty();

        self.world.query_capsule_triggers_into(
            &mut self.trigger_scratch,
            self.survivor.position,
            self.survivor.capsule,
            TriggerKind::Vault,
        );
        let vault_available = !self.trigger_scratch.is_empty();

        let eye = self.survivor.eye_position();
        let reach = eye + intent.direction * INTERACTION_REACH;
        self.world
            .sphere_cast_triggers_into(&mut self.cast_scratch, eye, reach, INTERACTION_SWEEP_RADIUS);
        let interaction_target = self
            .cast_scratch
            .iter()
            .find(|hit| hit.kind == TriggerKind::Interaction)
            .map(|hit| hit.entity);

        // 6. Bookkeeping
        self.stats.ticks += 1;
        self.stats.survivor_distance += survivor_start.horizontal_distance(self.survivor.position);
        self.stats.step_ups += u32::from(survivor.stepped_up) + u32::from(killer.stepped_up);
        self.stats.chase_ticks += u64::from(in_chase);
        self.stats.sighted_ticks += u64::from(killer_sees_survivor);
        self.stats.vault_ticks += u64::from(vault_available);
        self.stats.max_penetration = self
            .stats
            .max_penetration
            .max(survivor.max_penetration_depth)
            .max(killer.max_penetration_depth);

        if self.tick % self.tick_rate == 0 {
            log::info!(
                "t={:.1}s survivor {:?} (grounded: {}) killer {:?} | sighted: {} chase: {} vault: {} target: {:?}",
                self.tick as f32 * self.dt,
                self.survivor.position,
                self.survivor.grounded,
                self.killer.position,
                killer_sees_survivor,
                in_chase,
                vault_available,
                interaction_target
            );
        }

        TickReport {
            tick: self.tick,
            survivor,
            killer,
            killer_sees_survivor,
            in_chase,
            vault_available,
            interaction_target,
        }
    }

    fn killer_sees_survivor(&self) -> bool {
        self.world.has_line_of_sight(
            self.killer.eye_position(),
            self.survivor.eye_position(),
            Some(self.killer.entity),
        )
    }

    /// The collision world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn survivor(&self) -> &Actor {
        &self.survivor
    }

    pub fn killer(&self) -> &Actor {
        &self.killer
    }

    /// Mutable survivor access, e.g. to script teleports in tests
    pub fn survivor_mut(&mut self) -> &mut Actor {
        &mut self.survivor
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Two distinct entity ids the layout does not use
///
/// Ids are taken above the highest one in the layout, wrapping around to the
/// low end when that runs out.
fn free_entities(layout: &WorldLayout) -> [EntityId; 2] {
    let used: HashSet<u32> = layout
        .solids
        .iter()
        .map(|solid| solid.entity.0)
        .chain(layout.triggers.iter().map(|trigger| trigger.entity.0))
        .collect();

    let start = match used.iter().max() {
        None => 1,
        Some(&max) => max.checked_add(1).unwrap_or_else(|| {
            log::warn!("Layout '{}' uses entity id {}, allocating actor ids from 1", layout.name, max);
            1
        }),
    };

    let mut free = (start..=u32::MAX)
        .chain(1..start)
        .filter(|id| !used.contains(id))
        .map(EntityId);
    let first = free.next().unwrap_or_default();
    let second = free.next().unwrap_or_default();
    [first, second]
}

fn spawn_actor(
    world: &PhysicsWorld,
    layout: &WorldLayout,
    entity: EntityId,
    role: ActorRole,
    config: &ActorConfig,
) -> Actor {
    let requested = layout.spawn(role.spawn_name()).unwrap_or_else(|| {
        log::warn!("Layout '{}' has no {} spawn, using origin", layout.name, role.spawn_name());
        Vec3::new(0.0, config.height * 0.5, 0.0)
    });

    let position = world
        .resolve_spawn_position(requested, config.capsule())
        .unwrap_or(requested);

    Actor::new(entity, role, position, config)
}

/// Square route around the survivor's spawn
fn patrol_around(center: Vec3) -> WaypointScript {
    let corners = [(4.0, 0.0), (4.0, 6.0), (-4.0, 6.0), (-4.0, 0.0)];
    let waypoints = corners
        .iter()
        .enumerate()
        .map(|(i, &(x, z))| {
            let waypoint = Waypoint::new(center + Vec3::new(x, 0.0, z));
            // Hop once per lap
            if i == 2 {
                waypoint.with_jump()
            } else {
                waypoint
            }
        })
        .collect();

    WaypointScript::new(waypoints)
}
