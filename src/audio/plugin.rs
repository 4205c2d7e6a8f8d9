//! Audio plugin - kira channels driven by gameplay events.

use bevy::prelude::*;
use bevy_kira_audio::prelude::{AudioApp, AudioChannel, AudioControl};

use super::cues::{loop_change, LoopChange, SfxCue};
use super::music::{MusicDirector, MusicTrack};
use crate::combat::{CombatSet, Dead};
use crate::core::{FlowEvent, GameState, PickupCollected};
use crate::enemies::{Enemy, EnemyState};
use crate::player::{Player, Walking};

const FOOTSTEP_PATH: &str = "audio/footsteps.ogg";
const MUSIC_VOLUME: f64 = 0.5;
const FOOTSTEP_VOLUME: f64 = 0.4;

/// Background music. Never silenced by pause or level end.
#[derive(Resource)]
pub struct MusicChannel;

/// One-shot effects.
#[derive(Resource)]
pub struct SfxChannel;

#[derive(Resource)]
pub struct PlayerFootsteps;

#[derive(Resource)]
pub struct EnemyFootsteps;

/// Which footstep loops are currently running.
#[derive(Resource, Debug, Default)]
struct FootstepLoops {
    player: bool,
    enemies: bool,
}

/// Audio plugin - music, effects and footsteps. Expects kira's
/// `AudioPlugin` to be added by the app.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_channel::<MusicChannel>()
            .add_audio_channel::<SfxChannel>()
            .add_audio_channel::<PlayerFootsteps>()
            .add_audio_channel::<EnemyFootsteps>()
            .add_event::<SfxCue>()
            .init_resource::<MusicDirector>()
            .init_resource::<FootstepLoops>()
            .add_systems(OnEnter(GameState::MainMenu), request_menu_music)
            .add_systems(OnExit(GameState::InGame), silence_effects)
            .add_systems(Update, (apply_music, silence_on_flow_events))
            .add_systems(
                Update,
                (
                    (cue_pickup_sounds, play_sfx_cues).chain(),
                    update_footsteps,
                )
                    .in_set(CombatSet::Feedback),
            );
    }
}

fn request_menu_music(mut music: ResMut<MusicDirector>) {
    music.play(MusicTrack::Menu);
}

/// Switch the music channel to the requested track.
fn apply_music(
    mut music: ResMut<MusicDirector>,
    channel: Res<AudioChannel<MusicChannel>>,
    asset_server: Res<AssetServer>,
) {
    let Some(track) = music.take_pending() else {
        return;
    };

    debug!("Music -> {:?}", track);
    channel.stop();
    channel
        .play(asset_server.load(track.asset_path()))
        .looped()
        .with_volume(MUSIC_VOLUME);
}

/// Turn collected pickups into their sound cues.
fn cue_pickup_sounds(
    mut collected: EventReader<PickupCollected>,
    mut cues: EventWriter<SfxCue>,
) {
    for event in collected.read() {
        cues.send(SfxCue::from(event));
    }
}

/// Play queued one-shot effects. Only runs while gameplay is live, so cues
/// raised during pause or after the level ended are dropped.
fn play_sfx_cues(
    mut cues: EventReader<SfxCue>,
    channel: Res<AudioChannel<SfxChannel>>,
    asset_server: Res<AssetServer>,
) {
    for cue in cues.read() {
        channel.play(asset_server.load(cue.asset_path()));
    }
}

/// Footstep loop for the walking player and one shared loop for chasing
/// enemies.
fn update_footsteps(
    mut loops: ResMut<FootstepLoops>,
    player_query: Query<&Walking, (With<Player>, Without<Dead>)>,
    enemy_query: Query<&EnemyState, (With<Enemy>, Without<Dead>)>,
    player_channel: Res<AudioChannel<PlayerFootsteps>>,
    enemy_channel: Res<AudioChannel<EnemyFootsteps>>,
    asset_server: Res<AssetServer>,
) {
    let player_walking = player_query.get_single().is_ok_and(|walking| walking.0);
    let any_chasing = enemy_query.iter().any(|state| *state == EnemyState::Chasing);

    match loop_change(loops.player, player_walking) {
        Some(LoopChange::Start) => {
            player_channel
                .play(asset_server.load(FOOTSTEP_PATH))
                .looped()
                .with_volume(FOOTSTEP_VOLUME);
        }
        Some(LoopChange::Stop) => {
            player_channel.stop();
        }
        None => {}
    }
    loops.player = player_walking;

    match loop_change(loops.enemies, any_chasing) {
        Some(LoopChange::Start) => {
            enemy_channel
                .play(asset_server.load(FOOTSTEP_PATH))
                .looped()
                .with_volume(FOOTSTEP_VOLUME * 0.5);
        }
        Some(LoopChange::Stop) => {
            enemy_channel.stop();
        }
        None => {}
    }
    loops.enemies = any_chasing;
}

/// Pause and level end stop every effect channel. Music keeps playing.
fn silence_on_flow_events(
    mut flow_events: EventReader<FlowEvent>,
    loops: ResMut<FootstepLoops>,
    sfx: Res<AudioChannel<SfxChannel>>,
    player_steps: Res<AudioChannel<PlayerFootsteps>>,
    enemy_steps: Res<AudioChannel<EnemyFootsteps>>,
) {
    let silence = flow_events.read().any(|event| {
        matches!(
            event,
            FlowEvent::PauseChanged(true) | FlowEvent::GameOver | FlowEvent::Victory | FlowEvent::Reset
        )
    });

    if silence {
        silence_effects(loops, sfx, player_steps, enemy_steps);
    }
}

fn silence_effects(
    mut loops: ResMut<FootstepLoops>,
    sfx: Res<AudioChannel<SfxChannel>>,
    player_steps: Res<AudioChannel<PlayerFootsteps>>,
    enemy_steps: Res<AudioChannel<EnemyFootsteps>>,
) {
    sfx.stop();
    player_steps.stop();
    enemy_steps.stop();
    *loops = FootstepLoops::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PickupKind;

    #[test]
    fn collected_pickups_queue_their_sound() {
        let mut app = App::new();
        app.add_event::<PickupCollected>()
            .add_event::<SfxCue>()
            .add_systems(Update, cue_pickup_sounds);

        app.world_mut().send_event(PickupCollected {
            kind: PickupKind::Meat,
            position: Vec2::new(2.0, 3.0),
        });
        app.update();

        let events = app.world().resource::<Events<SfxCue>>();
        let cues: Vec<SfxCue> = events.get_cursor().read(events).copied().collect();
        assert_eq!(cues, vec![SfxCue::Pickup(PickupKind::Meat)]);
    }
}
