//! Face geometry analysis for a single photo.
//!
//! One face is located, its bounding box is reduced to a few ratios, the
//! ratios are classified into shape/symmetry/proportion labels and rendered
//! as a styling report. An edge map with facial-thirds guides is written
//! next to the photo.

pub mod error;

pub mod shared {
    pub mod bounding_box;
    pub mod constants;
    pub mod frame;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod edges {
    pub mod domain {
        pub mod edge_detector;
    }
    pub mod infrastructure {
        pub mod canny_edge_detector;
    }
}

pub mod imaging {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
    }
    pub mod infrastructure {
        pub mod image_file_reader;
        pub mod image_file_writer;
    }
}

pub mod analysis {
    pub mod classification;
    pub mod locale;
    pub mod ratios;
    pub mod report;
    pub mod thirds;
}

pub mod pipeline {
    pub mod analyze_face_use_case;
    pub mod analyzer_config;
    pub mod annotate_geometry_use_case;
    pub mod pipeline_logger;
}
