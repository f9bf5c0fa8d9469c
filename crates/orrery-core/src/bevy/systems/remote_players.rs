//! Proxy entities for remote participants.

use bevy::prelude::*;

use crate::bevy::components::RemotePlayerProxy;
use crate::bevy::resources::{OrreryState, RemoteProxies};
use crate::bevy::systems::room_sync::transform_of;

/// Edge length of a remote player's cube.
pub const PROXY_SIZE: f32 = 5.0;

/// Reconcile proxy entities with the session's peer set: spawn for new
/// peers, move existing ones, despawn departed ones.
pub fn sync_remote_players(
    mut commands: Commands,
    state: Res<OrreryState>,
    mut proxies: ResMut<RemoteProxies>,
    mut transforms: Query<&mut Transform, With<RemotePlayerProxy>>,
) {
    let peers = state.controller.session().peers();

    proxies.0.retain(|peer, entity| {
        if peers.contains_key(peer) {
            true
        } else {
            tracing::debug!("[room] removing proxy for {}", peer);
            commands.entity(*entity).despawn();
            false
        }
    });

    for (peer, record) in peers {
        let target = transform_of(record.player.position, record.player.orientation);
        match proxies.0.get(peer) {
            Some(entity) => {
                if let Ok(mut transform) = transforms.get_mut(*entity) {
                    *transform = target;
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        Name::new(format!("player-{peer}")),
                        RemotePlayerProxy { peer: *peer },
                        target,
                    ))
                    .id();
                proxies.0.insert(*peer, entity);
            }
        }
    }
}
