//! Live count of regular enemies in the current level.
//!
//! Membership is a component. Observers on its insertion and removal keep the
//! count, so an enemy is counted down exactly once whether it is killed,
//! despawned by other code or stripped of the component.

use bevy::prelude::*;

use crate::core::AllEnemiesCleared;

/// Counted enemy. Bosses never carry this.
#[derive(Component)]
pub struct RosterMember;

/// Remaining regular enemies and the one-shot boss trigger.
#[derive(Resource, Debug, Default)]
pub struct EnemyRoster {
    remaining: u32,
    tracking: bool,
    boss_triggered: bool,
}

impl EnemyRoster {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn boss_triggered(&self) -> bool {
        self.boss_triggered
    }

    /// Start counting for a fresh level.
    pub fn begin_level(&mut self) {
        self.remaining = 0;
        self.tracking = true;
        self.boss_triggered = false;
    }

    /// Stop counting. Used before level teardown so mass despawns are ignored.
    pub fn stop_tracking(&mut self) {
        self.tracking = false;
    }

    pub fn register(&mut self) {
        if self.tracking {
            self.remaining += 1;
        }
    }

    /// Count one enemy down. Returns true when this emptied the level and the
    /// boss has not been triggered yet.
    pub fn unregister(&mut self) -> bool {
        if !self.tracking {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0 && self.try_trigger_boss()
    }

    /// Claim the boss entrance. Only the first call per level succeeds.
    pub fn try_trigger_boss(&mut self) -> bool {
        if self.boss_triggered || !self.tracking {
            return false;
        }
        self.boss_triggered = true;
        true
    }
}

pub(super) fn on_member_added(_trigger: Trigger<OnAdd, RosterMember>, mut roster: ResMut<EnemyRoster>) {
    roster.register();
    if roster.is_tracking() {
        info!("Enemy registered. Total enemies: {}", roster.remaining());
    }
}

pub(super) fn on_member_removed(
    _trigger: Trigger<OnRemove, RosterMember>,
    mut roster: ResMut<EnemyRoster>,
    mut cleared: EventWriter<AllEnemiesCleared>,
) {
    let emptied = roster.unregister();
    if roster.is_tracking() {
        info!("Enemy killed. Remaining enemies: {}", roster.remaining());
    }
    if emptied {
        info!("All enemies defeated");
        cleared.send(AllEnemiesCleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_app() -> App {
        let mut app = App::new();
        app.init_resource::<EnemyRoster>()
            .add_event::<AllEnemiesCleared>()
            .add_observer(on_member_added)
            .add_observer(on_member_removed);
        app.world_mut().resource_mut::<EnemyRoster>().begin_level();
        app
    }

    fn cleared_count(app: &App) -> usize {
        app.world().resource::<Events<AllEnemiesCleared>>().len()
    }

    #[test]
    fn counts_down_once_per_enemy_whatever_the_path() {
        let mut app = roster_app();
        let stripped = app.world_mut().spawn(RosterMember).id();
        let killed = app.world_mut().spawn(RosterMember).id();
        assert_eq!(app.world().resource::<EnemyRoster>().remaining(), 2);

        app.world_mut().entity_mut(stripped).remove::<RosterMember>();
        app.world_mut().despawn(stripped);
        assert_eq!(app.world().resource::<EnemyRoster>().remaining(), 1);
        assert_eq!(cleared_count(&app), 0);

        app.world_mut().despawn(killed);
        assert_eq!(app.world().resource::<EnemyRoster>().remaining(), 0);
        assert_eq!(cleared_count(&app), 1);
    }

    #[test]
    fn teardown_after_stop_tracking_is_ignored() {
        let mut app = roster_app();
        let enemy = app.world_mut().spawn(RosterMember).id();
        app.world_mut().resource_mut::<EnemyRoster>().stop_tracking();
        app.world_mut().despawn(enemy);
        assert_eq!(cleared_count(&app), 0);
    }

    #[test]
    fn boss_triggers_only_once_per_level() {
        let mut roster = EnemyRoster::default();
        roster.begin_level();
        roster.register();
        assert!(roster.unregister());

        // Summoned minions empty the level again
        roster.register();
        assert!(!roster.unregister());
        assert!(!roster.try_trigger_boss());

        roster.begin_level();
        assert!(roster.try_trigger_boss());
    }

    #[test]
    fn unregister_never_underflows() {
        let mut roster = EnemyRoster::default();
        roster.begin_level();
        roster.try_trigger_boss();
        assert!(!roster.unregister());
        assert_eq!(roster.remaining(), 0);
    }
}
