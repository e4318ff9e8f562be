//! Reference rows present on every install. `title` is the natural key.

#[derive(Debug, Clone, Copy)]
pub struct ProgramSeed {
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CareerSeed {
    pub title: &'static str,
    pub department: &'static str,
    pub location: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub requirements: &'static str,
}

pub const PROGRAMS: &[ProgramSeed] = &[
    ProgramSeed {
        title: "Tech for All",
        category: "Education",
        description: "Digital literacy classes and refurbished laptops for students in underserved schools.",
        image: "/images/programs/tech-for-all.jpg",
        icon: "laptop",
    },
    ProgramSeed {
        title: "Healthy Futures",
        category: "Health",
        description: "Mobile clinics and nutrition workshops for rural families.",
        image: "/images/programs/healthy-futures.jpg",
        icon: "heart-pulse",
    },
    ProgramSeed {
        title: "Women Rising",
        category: "Empowerment",
        description: "Vocational training, micro-grants and mentoring for women entrepreneurs.",
        image: "/images/programs/women-rising.jpg",
        icon: "users",
    },
    ProgramSeed {
        title: "Clean Water Initiative",
        category: "Environment",
        description: "Well restoration and water filtration units for drought-affected villages.",
        image: "/images/programs/clean-water.jpg",
        icon: "droplet",
    },
    ProgramSeed {
        title: "Bright Minds Scholarship",
        category: "Education",
        description: "Tuition and mentoring for first-generation college students.",
        image: "/images/programs/bright-minds.jpg",
        icon: "graduation-cap",
    },
];

pub const CAREERS: &[CareerSeed] = &[
    CareerSeed {
        title: "Program Coordinator",
        department: "Programs",
        location: "Bengaluru",
        kind: "Full-time",
        description: "Plan and run field programs with partner schools and community groups.",
        requirements: "2+ years in community development; fluent English and Kannada.",
    },
    CareerSeed {
        title: "Fundraising Associate",
        department: "Development",
        location: "Remote",
        kind: "Full-time",
        description: "Grow individual and corporate giving, manage donor relationships.",
        requirements: "Experience with donor CRMs; strong written communication.",
    },
    CareerSeed {
        title: "Volunteer Teacher",
        department: "Education",
        location: "Mysuru",
        kind: "Volunteer",
        description: "Teach weekend digital literacy sessions for the Tech for All program.",
        requirements: "Comfort with basic computing; commitment of 4 hours a week.",
    },
];
