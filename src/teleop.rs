use macroquad::input::KeyCode;
use simbot_kinematics::DriveCommand;

/// WASD drive speeds. The first held key in this order wins.
pub const KEY_SPEEDS: [(KeyCode, DriveCommand); 4] = [
    (KeyCode::W, DriveCommand::new(0.60, 0.60)),
    (KeyCode::A, DriveCommand::new(0.40, -0.40)),
    (KeyCode::S, DriveCommand::new(-0.60, -0.60)),
    (KeyCode::D, DriveCommand::new(-0.40, 0.40)),
];

/// Keyboard command source.
///
/// Emits the held key's command every poll, then a single stop once all
/// drive keys are released.
#[derive(Debug, Default)]
pub struct Teleop {
    driving: bool,
}

impl Teleop {
    pub fn poll(&mut self, is_down: impl Fn(KeyCode) -> bool) -> Option<DriveCommand> {
        let held = KEY_SPEEDS
            .iter()
            .find(|(key, _)| is_down(*key))
            .map(|(_, command)| *command);

        match held {
            Some(command) => {
                self.driving = true;
                Some(command)
            }
            None if self.driving => {
                self.driving = false;
                Some(DriveCommand::STOP)
            }
            None => None,
        }
    }
}
