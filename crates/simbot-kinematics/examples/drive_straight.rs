use simbot_kinematics::*;

fn main() {
    let wheel_radius = 0.0508;
    let wheelbase = 0.2286;
    let max_rpm = 200.0;
    let pixels_per_meter = 60.0 / 0.3048;
    let kinematics_result = DifferentialDrive::new(wheel_radius, wheelbase, max_rpm, pixels_per_meter);

    let mut current_pose = Pose::new(60.0, 60.0, 90.0);
    let command = DriveCommand::new(0.6, 0.6);
    let dt = 0.02; // 50 Hz
    let num_steps = 10;

    match kinematics_result {
        Ok(kinematics) => {
            println!("Initializing simulation...");
            println!("  {}", kinematics);
            println!("  Command:      {}", command);
            println!("  Chassis:      {}", kinematics.compute_velocity(command.left, command.right));
            println!("  Initial Pose: {}", current_pose);
            println!();

            for i in 0..num_steps {
                match kinematics.update_pose_from_command(current_pose, command, dt) {
                    Ok(new_pose) => {
                        current_pose = new_pose;
                        println!("Step {:>2}: Pose: {}", i + 1, current_pose);
                    }
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break;
                    }
                }
            }

            println!();
            println!("Final Pose: {:?}", current_pose);
        }
        Err(e) => eprintln!("Failed to initialize kinematics: {}", e),
    }
}
