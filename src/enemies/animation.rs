//! Enemy sprite presentation driven by animation flags.

use bevy::prelude::*;

use super::components::{AnimationFlags, BodyTint, Enemy};
use crate::combat::Facing;

/// Sprite colour for the current flags. Hit enemies flash pale and attacking
/// enemies brighten.
pub fn flag_tint(flags: &AnimationFlags, base: Color) -> Color {
    let base = base.to_srgba();
    if flags.knockback {
        base.mix(&Srgba::WHITE, 0.6).into()
    } else if flags.attacking {
        base.mix(&Srgba::WHITE, 0.25).into()
    } else {
        base.into()
    }
}

/// Apply flags and facing to enemy sprites.
pub fn animate_enemies(
    mut query: Query<
        (&AnimationFlags, &BodyTint, &Facing, &mut Sprite),
        (With<Enemy>, Or<(Changed<AnimationFlags>, Changed<BodyTint>, Changed<Facing>)>),
    >,
) {
    for (flags, tint, facing, mut sprite) in query.iter_mut() {
        sprite.flip_x = facing.is_left();
        sprite.color = flag_tint(flags, tint.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_and_chasing_keep_the_base_colour() {
        let base = Color::srgb(0.2, 0.4, 0.6);
        let flags = AnimationFlags::default();
        assert_eq!(flag_tint(&flags, base), base);

        let chasing = AnimationFlags { idle: false, chasing: true, ..flags };
        assert_eq!(flag_tint(&chasing, base), base);
    }

    #[test]
    fn knockback_flashes_towards_white() {
        let base = Color::srgb(0.0, 0.0, 0.0);
        let flags = AnimationFlags { idle: false, knockback: true, ..Default::default() };
        let tinted = flag_tint(&flags, base).to_srgba();
        assert!(tinted.red > 0.5);
        assert!(tinted.green > 0.5);
    }
}
