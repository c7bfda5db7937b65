//! Console variables: store + typed snapshots
//!
//! Lifecycle:
//! - plugin build (module load) → game cvars регистрируются
//! - первый Player → pl_* cvars (см. `player::lifecycle`)
//! - `AppExit` (module unload) → store освобождается целиком

use bevy::prelude::*;

pub mod game;
pub mod store;


pub use game::{game_cvar_defs, player_cvar_defs, GameCVars, PlayerCVars};
pub use store::{CVarDef, CVarEntry, CVarError, CVarFlags, CVarStore, CVarValue};

pub struct CVarsPlugin;

impl Plugin for CVarsPlugin {
    fn build(&self, app: &mut App) {
        let mut store = CVarStore::new();
        if let Err(err) = store.register_all(&game_cvar_defs()) {
            crate::log_error(&format!("Failed to register game cvars: {}", err));
        }

        app.insert_resource(store)
            .init_resource::<GameCVars>()
            .init_resource::<PlayerCVars>();

        // Snapshots обновляются до gameplay систем кадра
        app.add_systems(PreUpdate, refresh_cvar_snapshots)
            .add_systems(Last, release_cvars_on_exit);
    }
}

/// System: пересобирает snapshots когда store изменился
///
/// PlayerCVars обновляется только пока pl_* зарегистрированы;
/// без игрока остаётся последний snapshot.
pub fn refresh_cvar_snapshots(
    store: Res<CVarStore>,
    mut game: ResMut<GameCVars>,
    mut player: ResMut<PlayerCVars>,
) {
    if !store.is_changed() {
        return;
    }

    if let Ok(snapshot) = GameCVars::from_store(&store) {
        if *game != snapshot {
            *game = snapshot;
        }
    }

    if let Ok(snapshot) = PlayerCVars::from_store(&store) {
        if *player != snapshot {
            *player = snapshot;
        }
    }
}

/// System: module unload
pub fn release_cvars_on_exit(mut exit_events: EventReader<AppExit>, mut store: ResMut<CVarStore>) {
    if exit_events.read().next().is_some() {
        let count = store.len();
        store.release_all();
        crate::log_info(&format!("Released {} cvars", count));
    }
}
