use crate::{
    application::{
        acquire_image::use_case::AcquireImageUseCase, upload_image::use_case::UploadImageUseCase,
    },
    config::Config,
    infrastructure::{
        detection::http_detection_client::HttpDetectionClient,
        device::command_camera::CommandCamera,
        storage::{
            content_source::DefaultContentSource, image_resolver::ImageSourceResolver,
            temp_files::TempFileProvisioner,
        },
    },
    presentation::terminal::{
        console::{Console, ConsoleGalleryPicker, ConsolePermissionGate},
        notices,
        screen::{Navigator, Route},
    },
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

const HELP: &str = "\
camera     take a picture and detect
gallery    choose an existing image (path, file:// URI or URL) and detect
home       show the home screen
dashboard  show the dashboard screen
status     redraw the current screen
back/quit  leave the application (asks for confirmation)
help       this text";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Wire the pipeline from `config` and run the interactive terminal front-end
/// until the user confirms exit or input ends.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let start: Route = config
        .start_screen
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let console = Console::stdin();
    let provisioner = Arc::new(TempFileProvisioner::new(config.image_cache_dir.clone()));
    let detector = Arc::new(HttpDetectionClient::new(
        &config.detection_base_url,
        config.detection_timeout(),
    )?);
    let content = Arc::new(DefaultContentSource::new(config.detection_timeout())?);
    let uploader = Arc::new(UploadImageUseCase::new(
        ImageSourceResolver::new(provisioner.clone(), content),
        detector.clone(),
    ));

    let (mut acquisition, mut outcomes) = AcquireImageUseCase::new(
        Arc::new(CommandCamera::new(&config.camera_command)?),
        Arc::new(ConsoleGalleryPicker::new(console.clone())),
        Arc::new(ConsolePermissionGate::new(
            console.clone(),
            config.camera_permission_granted,
        )),
        provisioner,
        uploader,
    );

    info!(
        endpoint = %detector.endpoint(),
        cache_dir = %config.image_cache_dir.display(),
        "Detection client ready"
    );

    let mut navigator = Navigator::new(start);
    let mut states = acquisition.subscribe();
    let mut events = acquisition.events();
    println!("{}", navigator.screen().render(&acquisition.state()));

    loop {
        tokio::select! {
            line = console.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed, leaving");
                    break;
                };
                let flow = handle_command(&line, &console, &mut acquisition, &mut navigator).await?;
                if flow == Flow::Exit {
                    break;
                }
            }
            Some(outcome) = outcomes.recv() => {
                acquisition.finish_upload(outcome);
            }
            Ok(()) = states.changed() => {
                let state = states.borrow_and_update().clone();
                println!("{}", navigator.screen().render(&state));
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(notice) = notices::for_event(&event) {
                        println!("* {}", notice);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Notice stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

async fn handle_command(
    line: &str,
    console: &Console,
    acquisition: &mut AcquireImageUseCase,
    navigator: &mut Navigator,
) -> anyhow::Result<Flow> {
    let screen = navigator.screen();
    let command = line.to_ascii_lowercase();

    let transition = match command.as_str() {
        "" => return Ok(Flow::Continue),
        "camera" => acquisition.capture_from_camera().await,
        "gallery" => acquisition.pick_from_gallery().await,
        "home" | "dashboard" => {
            if let Ok(route) = command.parse::<Route>() {
                if navigator.navigate(route) {
                    info!(route = ?navigator.current(), "Screen changed");
                    println!("{}", navigator.screen().render(&acquisition.state()));
                }
            }
            Ok(())
        }
        "status" => {
            println!("{}", screen.render(&acquisition.state()));
            Ok(())
        }
        "help" => {
            println!("{}", HELP);
            Ok(())
        }
        "back" | "quit" | "exit" => {
            acquisition.request_quit();
            println!("{}", screen.render_dialog());
            let answer = console.prompt(">").await?.unwrap_or_default();
            if screen.config().confirms(&answer) && acquisition.confirm_quit() {
                info!("Exit confirmed");
                return Ok(Flow::Exit);
            }
            acquisition.cancel_quit();
            Ok(())
        }
        other => {
            println!("Unknown command '{}', try 'help'", other);
            Ok(())
        }
    };

    if let Err(e) = transition {
        println!("* {}", notices::for_transition(&e));
    }
    Ok(Flow::Continue)
}
