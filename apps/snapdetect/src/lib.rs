pub mod config;

pub mod domain {
    pub mod acquisition {
        pub mod entity;
        pub mod errors;
        pub mod events;
    }
    pub mod detection {
        pub mod entity;
    }
}

pub mod application {
    pub mod acquire_image {
        pub mod dto;
        pub mod state_machine;
        pub mod use_case;
    }
    pub mod upload_image {
        pub mod dto;
        pub mod use_case;
    }
}

pub mod infrastructure {
    pub mod detection {
        pub mod http_detection_client;
        pub mod traits;
    }
    pub mod device {
        pub mod command_camera;
        pub mod traits;
    }
    pub mod storage {
        pub mod content_source;
        pub mod image_resolver;
        pub mod temp_files;
        pub mod traits;
    }
}

pub mod presentation {
    pub mod terminal {
        pub mod app;
        pub mod console;
        pub mod notices;
        pub mod screen;
    }
}
